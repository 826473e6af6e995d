/*
Wristwatch - Wrist Watch HUD
*/
use bevy::prelude::*;

use super::hud::{
    apply_handedness,
    apply_watch_size,
    label_scale,
    parse_watch_color,
    WatchBody,
    WatchParts,
    NORMAL_HEALTH_COLOR,
    NORMAL_INFECTION_COLOR,
    NORMAL_OXYGEN_COLOR,
};
use super::radial::RadialMenu;
use super::state::{Watch, WatchMode, WieldedItem};
use super::widgets::{DividedBar, RichLabel};
use super::ModeRequest;
use crate::audio::{HapticPulse, PlayUiSound, UiSoundKind};
use crate::objective::{build_objective_text, ObjectiveProgression};
use crate::settings::{WatchSettingChanged, WatchSettingKind, WatchSettings};
use crate::team::InventorySlot;

/// A Chat Line Came in From the Game
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub struct ChatMessageReceived(pub String);

/// Objective Panel Contents Were Rewritten
#[derive(Message, Debug, Clone, Default)]
pub struct ObjectivesUpdated(pub Vec<ObjectiveProgression>);

/// Local Player Switched What's in Their Hands
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct ItemWielded(pub WieldedItem);

#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct InventoryAmmoUpdated {
    pub slot: InventorySlot,
    pub bullets_max_cap: i32,
    /// Reserve as a Fraction of 'bullets_max_cap'
    pub rel_in_pack: f32,
    pub bullet_clip_size: i32,
    pub clip_left: i32,
}

impl InventoryAmmoUpdated {
    pub fn reserve(&self) -> i32 {
        (self.bullets_max_cap as f32 * self.rel_in_pack) as i32
    }
}

/// Local Player's Own Readings, All 0.0 ..= 1.0
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub enum LocalVitalsUpdated {
    Health(f32),
    Infection(f32),
    Air(f32),
}

fn lerp_color(a: Color, b: Color, t: f32) -> Color {
    let (a, b) = (a.to_srgba(), b.to_srgba());
    let t = t.clamp(0.0, 1.0);
    let mix = |x: f32, y: f32| x + (y - x) * t;
    Color::srgba(
        mix(a.red, b.red),
        mix(a.green, b.green),
        mix(a.blue, b.blue),
        mix(a.alpha, b.alpha),
    )
}

fn brighten(c: Color, k: f32) -> Color {
    let c = c.to_srgba();
    Color::srgba(c.red * k, c.green * k, c.blue * k, c.alpha)
}

pub fn health_bar_color(health: f32) -> Color {
    lerp_color(NORMAL_HEALTH_COLOR, brighten(NORMAL_HEALTH_COLOR, 1.8), 1.0 - health)
}

pub fn infection_bar_color(infection: f32) -> Color {
    lerp_color(NORMAL_INFECTION_COLOR, brighten(NORMAL_INFECTION_COLOR, 1.6), infection)
}

pub fn oxygen_bar_color(air: f32) -> Color {
    if air < 0.5 {
        lerp_color(Color::srgb(1.0, 0.0, 0.0), NORMAL_OXYGEN_COLOR, air * 1.6)
    } else {
        NORMAL_OXYGEN_COLOR
    }
}

pub fn numbered_ammo_text(clip_left: i32, reserve: i32) -> String {
    format!("{clip_left}\n----\n{reserve}")
}

/// New Chat Line: Buzz, Chime and Redraw (Duplicates are Ignored)
pub(crate) fn bridge_chat_messages(
    mut incoming: MessageReader<ChatMessageReceived>,
    mut q_watch: Query<(&mut Watch, &WatchParts)>,
    mut q_labels: Query<&mut RichLabel>,
    mut haptics: MessageWriter<HapticPulse>,
    mut sounds: MessageWriter<PlayUiSound>,
) {
    for ChatMessageReceived(msg) in incoming.read() {
        for (mut watch, parts) in &mut q_watch {
            if !watch.chat.push(msg.as_str()) {
                continue;
            }
            haptics.write(HapticPulse::CHAT);
            sounds.write(PlayUiSound { kind: UiSoundKind::MenuChangePage });

            if let Ok(mut label) = q_labels.get_mut(parts.chat) {
                label.set_markup(watch.chat.render());
            }
        }
    }
}

pub(crate) fn bridge_objectives(
    mut incoming: MessageReader<ObjectivesUpdated>,
    q_watch: Query<&WatchParts, With<Watch>>,
    mut q_labels: Query<&mut RichLabel>,
    mut haptics: MessageWriter<HapticPulse>,
) {
    for ObjectivesUpdated(progressions) in incoming.read() {
        let text = build_objective_text(progressions);
        for parts in &q_watch {
            let Ok(mut label) = q_labels.get_mut(parts.objective) else {
                continue;
            };
            label.set_markup(text.as_str());
            haptics.write(HapticPulse::OBJECTIVE);
        }
    }
}

/// Highlights the Wielded Slot's Bar and Resizes the Magazine
pub(crate) fn bridge_item_wielded(
    mut incoming: MessageReader<ItemWielded>,
    settings: Res<WatchSettings>,
    mut q_watch: Query<(&mut Watch, &WatchParts)>,
    mut q_bars: Query<&mut DividedBar>,
    mut q_labels: Query<&mut RichLabel>,
) {
    for ItemWielded(item) in incoming.read() {
        for (mut watch, parts) in &mut q_watch {
            watch.wielded = Some(*item);

            let selected = parts.ammo_bar(item.slot);
            for &bar_e in parts.ammo_bars.values() {
                if let Ok(mut bar) = q_bars.get_mut(bar_e) {
                    let on = Some(bar_e) == selected;
                    if bar.selected != on {
                        bar.set_selected(on);
                    }
                }
            }

            let Ok(mut magazine) = q_bars.get_mut(parts.magazine) else {
                continue;
            };
            if item.shootable {
                if !settings.use_numbers_for_ammo {
                    magazine.max_value = item.max_clip;
                    magazine.current_value = item.current_clip;
                    magazine.update_ammo_grid_divisions();
                }
            } else {
                magazine.current_value = 0;
                magazine.update_shader_vals(1, 1);
                if let Ok(mut label) = q_labels.get_mut(parts.numbered_ammo) {
                    label.set_markup("");
                }
            }
        }
    }
}

pub(crate) fn bridge_inventory_ammo(
    mut incoming: MessageReader<InventoryAmmoUpdated>,
    q_watch: Query<(&Watch, &WatchParts)>,
    mut q_bars: Query<&mut DividedBar>,
    mut q_labels: Query<&mut RichLabel>,
) {
    for ammo in incoming.read() {
        for (watch, parts) in &q_watch {
            // Magazine only follows the gun in hand
            let in_hand = watch
                .wielded
                .is_some_and(|w| w.shootable && w.slot == ammo.slot);
            if in_hand {
                if let Ok(mut label) = q_labels.get_mut(parts.numbered_ammo) {
                    label.set_markup(numbered_ammo_text(ammo.clip_left, ammo.reserve()));
                }
                if let Ok(mut magazine) = q_bars.get_mut(parts.magazine) {
                    magazine.max_value = ammo.bullet_clip_size.max(1);
                    magazine.update_current_ammo(ammo.clip_left);
                    magazine.update_ammo_grid_divisions();
                }
            }

            let Some(bar_e) = parts.ammo_bar(ammo.slot) else {
                continue;
            };
            let Ok(mut bar) = q_bars.get_mut(bar_e) else {
                continue;
            };
            bar.max_value = ammo.bullets_max_cap;
            bar.current_value = ammo.reserve() + ammo.clip_left;
            bar.set_fill(ammo.rel_in_pack);

            if ammo.slot.is_weapon() {
                bar.update_weapon_mag_divisions(ammo.bullet_clip_size, ammo.bullets_max_cap);
            }
            if ammo.slot.is_pack_or_consumable() {
                bar.update_pack_or_consumable_divisions();
            }
        }
    }
}

/// Bar Values and Colors; Visibility is Decided per Mode
pub(crate) fn bridge_local_vitals(
    mut incoming: MessageReader<LocalVitalsUpdated>,
    mut q_watch: Query<(&mut Watch, &WatchParts)>,
    mut q_bars: Query<&mut DividedBar>,
) {
    for update in incoming.read() {
        for (mut watch, parts) in &mut q_watch {
            let (bar_e, value, color) = match *update {
                LocalVitalsUpdated::Health(h) => {
                    watch.vitals.health = h;
                    (parts.health, h, health_bar_color(h))
                }
                LocalVitalsUpdated::Infection(i) => {
                    watch.vitals.infection = i;
                    (parts.infection, i, infection_bar_color(i))
                }
                LocalVitalsUpdated::Air(a) => {
                    watch.vitals.oxygen = a;
                    (parts.oxygen, a, oxygen_bar_color(a))
                }
            };

            if let Ok(mut bar) = q_bars.get_mut(bar_e) {
                bar.update_fill((value * 100.0) as i32);
                bar.set_color(color);
            }
        }
    }
}

fn changed(incoming: &mut MessageReader<WatchSettingChanged>, kind: WatchSettingKind) -> bool {
    // Drain everything so the reader never lags behind
    incoming.read().fold(false, |hit, WatchSettingChanged(k)| hit || *k == kind)
}

/// Re-Enter the Current Mode so the Numbers / Grid Choice Applies
pub(crate) fn on_ammo_numbers_changed(
    mut incoming: MessageReader<WatchSettingChanged>,
    mut requests: MessageWriter<ModeRequest>,
) {
    if changed(&mut incoming, WatchSettingKind::AmmoNumbers) {
        requests.write(ModeRequest::Reapply);
    }
}

pub(crate) fn on_watch_scale_changed(
    mut incoming: MessageReader<WatchSettingChanged>,
    settings: Res<WatchSettings>,
    mut q_watch: Query<(&mut Node, &WatchParts), With<Watch>>,
    mut q_labels: Query<&mut RichLabel>,
) {
    if !changed(&mut incoming, WatchSettingKind::WatchScale) {
        return;
    }

    let scale = label_scale(&settings);
    for (mut node, parts) in &mut q_watch {
        apply_watch_size(&mut node, &settings);
        for e in [parts.objective, parts.chat, parts.status, parts.numbered_ammo] {
            if let Ok(mut label) = q_labels.get_mut(e) {
                label.scale = scale;
            }
        }
    }
}

pub(crate) fn on_watch_color_changed(
    mut incoming: MessageReader<WatchSettingChanged>,
    settings: Res<WatchSettings>,
    mut q_body: Query<&mut BackgroundColor, With<WatchBody>>,
) {
    if !changed(&mut incoming, WatchSettingKind::WatchColor) {
        return;
    }

    let Some(color) = parse_watch_color(&settings.watch_color) else {
        warn!("Watch color {:?} is not a hex color", settings.watch_color);
        return;
    };
    for mut bg in &mut q_body {
        bg.0 = color.with_alpha(0.25);
    }
}

pub(crate) fn on_radial_info_text_changed(
    mut incoming: MessageReader<WatchSettingChanged>,
    settings: Res<WatchSettings>,
    mut q_menu: Query<&mut RadialMenu>,
) {
    if !changed(&mut incoming, WatchSettingKind::RadialInfoText) {
        return;
    }
    for mut menu in &mut q_menu {
        menu.toggle_all_info_text(settings.radial_info_text);
    }
}

/// Chat Turned Off While Showing It: Move On to the Next Face
pub(crate) fn on_chat_on_watch_changed(
    mut incoming: MessageReader<WatchSettingChanged>,
    settings: Res<WatchSettings>,
    q_watch: Query<&Watch>,
    mut requests: MessageWriter<ModeRequest>,
) {
    if !changed(&mut incoming, WatchSettingKind::ChatOnWatch) || settings.chat_on_watch {
        return;
    }
    if q_watch.iter().any(|w| w.mode() == WatchMode::Chat) {
        requests.write(ModeRequest::Advance { manual: false });
    }
}

pub(crate) fn on_handedness_changed(
    mut incoming: MessageReader<WatchSettingChanged>,
    settings: Res<WatchSettings>,
    mut q_watch: Query<&mut Node, With<Watch>>,
) {
    if !changed(&mut incoming, WatchSettingKind::Handedness) {
        return;
    }
    for mut node in &mut q_watch {
        apply_handedness(&mut node, settings.use_left_hand);
    }
}
