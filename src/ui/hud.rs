/*
Wristwatch - Wrist Watch HUD
*/
use bevy::prelude::*;
use std::collections::HashMap;

use super::radial::RadialMenu;
use super::state::{Watch, WatchMode};
use super::widgets::{BarFill, DividedBar, RichLabel};
use super::{ModeRequest, TeardownWatch};
use crate::audio::HapticPulse;
use crate::input::WatchAction;
use crate::settings::WatchSettings;
use crate::status::{collect_snapshots, render_team_status};
use crate::team::{AgentDamage, InventorySlot, PlayerAgent, PlayerBackpack};

const WATCH_BASE_W: f32 = 220.0;
const WATCH_BASE_H: f32 = 270.0;
const WATCH_BASE_SCALE: f32 = 1.25;
/// Markup Sizes are Authored for a Much Bigger Face
const TEXT_PX_PER_UNIT: f32 = 0.4;
const UI_PAD: f32 = 8.0;

const BAR_H: f32 = 10.0;

pub(crate) const NORMAL_HEALTH_COLOR: Color = Color::srgb(0.66, 0.0, 0.0);
pub(crate) const NORMAL_INFECTION_COLOR: Color = Color::srgb(0.533, 1.0, 0.8);
pub(crate) const NORMAL_OXYGEN_COLOR: Color = Color::srgb(0.0, 1.0, 1.0);
const OBJECTIVE_TEXT_COLOR: Color = Color::srgba(1.0, 1.0, 1.0, 0.6);

/// Strap + Face Background, Tinted by the Watch Color Setting
#[derive(Component)]
pub struct WatchBody;

#[derive(Component)]
pub struct InventoryPanel;

#[derive(Component)]
pub struct ObjectivePanel;

#[derive(Component)]
pub struct ChatPanel;

#[derive(Component)]
pub struct StatusPanel;

/// Entities Making up One Watch
#[derive(Component, Debug, Clone)]
pub struct WatchParts {
    pub body: Entity,
    pub inventory: Entity,
    pub objective: Entity,
    pub chat: Entity,
    pub status: Entity,
    /// ConsumableHeavy Shares the Consumable Bar
    pub ammo_bars: HashMap<InventorySlot, Entity>,
    pub magazine: Entity,
    pub numbered_ammo: Entity,
    pub health: Entity,
    pub infection: Entity,
    pub oxygen: Entity,
}

impl WatchParts {
    pub fn ammo_bar(&self, slot: InventorySlot) -> Option<Entity> {
        self.ammo_bars.get(&slot).copied()
    }
}

pub fn watch_scale_factor(settings: &WatchSettings) -> f32 {
    WATCH_BASE_SCALE * settings.effective_watch_scale()
}

pub fn label_scale(settings: &WatchSettings) -> f32 {
    TEXT_PX_PER_UNIT * watch_scale_factor(settings)
}

/// Gun Hand Decides the Wrist, the Watch Sits on the Other Side
pub fn apply_handedness(node: &mut Node, use_left_hand: bool) {
    if use_left_hand {
        node.left = Val::Auto;
        node.right = Val::Px(UI_PAD);
    } else {
        node.left = Val::Px(UI_PAD);
        node.right = Val::Auto;
    }
}

pub fn apply_watch_size(node: &mut Node, settings: &WatchSettings) {
    let k = watch_scale_factor(settings);
    node.width = Val::Px(WATCH_BASE_W * k);
    node.height = Val::Px(WATCH_BASE_H * k);
}

pub fn parse_watch_color(hex: &str) -> Option<Color> {
    Srgba::hex(hex.trim()).ok().map(Color::from)
}

fn spawn_bar(commands: &mut Commands, parent: Entity, bar: DividedBar) -> Entity {
    let fill_color = bar.display_color();
    let fill = bar.fill;
    let e = commands
        .spawn((
            bar,
            Node {
                width: Val::Percent(100.0),
                height: Val::Px(BAR_H),
                margin: UiRect::bottom(Val::Px(2.0)),
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.5)),
            Visibility::Inherited,
            ChildOf(parent),
        ))
        .id();
    commands.spawn((
        BarFill,
        Node {
            width: Val::Percent(fill * 100.0),
            height: Val::Percent(100.0),
            ..default()
        },
        BackgroundColor(fill_color),
        ChildOf(e),
    ));
    e
}

fn spawn_label(
    commands: &mut Commands,
    parent: Entity,
    label: RichLabel,
    visible: bool,
) -> Entity {
    commands
        .spawn((
            Text::new(""),
            label,
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(UI_PAD),
                right: Val::Px(UI_PAD),
                top: Val::Px(UI_PAD),
                ..default()
            },
            if visible { Visibility::Inherited } else { Visibility::Hidden },
            ChildOf(parent),
        ))
        .id()
}

/// Builds One Watch With Every Panel, Initial Mode Applied
pub fn spawn_watch(commands: &mut Commands, settings: &WatchSettings) -> Entity {
    let mut root_node = Node {
        position_type: PositionType::Absolute,
        bottom: Val::Px(UI_PAD),
        ..default()
    };
    apply_watch_size(&mut root_node, settings);
    apply_handedness(&mut root_node, settings.use_left_hand);

    let root = commands
        .spawn((Name::new("watch"), root_node, Visibility::Visible))
        .id();

    let body_color = parse_watch_color(&settings.watch_color).unwrap_or_else(|| {
        warn!("Watch color {:?} is not a hex color, using white", settings.watch_color);
        Color::WHITE
    });
    let body = commands
        .spawn((
            WatchBody,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                padding: UiRect::all(Val::Px(UI_PAD)),
                ..default()
            },
            BackgroundColor(body_color.with_alpha(0.25)),
            ChildOf(root),
        ))
        .id();

    let inventory = commands
        .spawn((
            InventoryPanel,
            Node {
                width: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                ..default()
            },
            Visibility::Inherited,
            ChildOf(body),
        ))
        .id();

    // Ammo by slot
    let mut ammo_bars = HashMap::new();
    for slot in [
        InventorySlot::GearStandard,
        InventorySlot::GearSpecial,
        InventorySlot::GearClass,
        InventorySlot::ResourcePack,
        InventorySlot::Consumable,
    ] {
        let e = spawn_bar(commands, inventory, DividedBar::new(DividedBar::NORMAL_COLOR));
        ammo_bars.insert(slot, e);
        if slot == InventorySlot::Consumable {
            ammo_bars.insert(InventorySlot::ConsumableHeavy, e);
        }
    }

    // Vitals start full, infection empty
    let mut health_bar = DividedBar::new(NORMAL_HEALTH_COLOR);
    health_bar.update_shader_vals(5, 2);
    let health = spawn_bar(commands, inventory, health_bar);

    let mut infection_bar = DividedBar::new(NORMAL_INFECTION_COLOR);
    infection_bar.current_value = 0;
    infection_bar.set_fill(0.0);
    infection_bar.update_shader_vals(5, 2);
    infection_bar.toggle_rendering(false);
    let infection = spawn_bar(commands, inventory, infection_bar);

    let mut oxygen_bar = DividedBar::new(NORMAL_OXYGEN_COLOR);
    oxygen_bar.update_shader_vals(5, 2);
    oxygen_bar.toggle_rendering(false);
    let oxygen = spawn_bar(commands, inventory, oxygen_bar);

    let mut magazine_bar = DividedBar::new(DividedBar::NORMAL_COLOR);
    magazine_bar.current_value = 0;
    magazine_bar.set_fill(0.0);
    magazine_bar.toggle_rendering(!settings.use_numbers_for_ammo);
    let magazine = spawn_bar(commands, inventory, magazine_bar);

    let mut numbered_label = RichLabel::new(80.0, DividedBar::NORMAL_COLOR);
    numbered_label.scale = label_scale(settings);
    let numbered_ammo = commands
        .spawn((
            Text::new(""),
            numbered_label,
            if settings.use_numbers_for_ammo { Visibility::Inherited } else { Visibility::Hidden },
            ChildOf(inventory),
        ))
        .id();

    let scale = label_scale(settings);
    let mut objective_label = RichLabel::new(28.0, OBJECTIVE_TEXT_COLOR);
    objective_label.scale = scale;
    let objective = spawn_label(commands, body, objective_label, false);
    commands.entity(objective).insert(ObjectivePanel);

    let mut chat_label = RichLabel::new(28.0, Color::WHITE);
    chat_label.scale = scale;
    let chat = spawn_label(commands, body, chat_label, false);
    commands.entity(chat).insert(ChatPanel);

    let mut status_label = RichLabel::new(26.0, Color::WHITE);
    status_label.scale = scale;
    let status = spawn_label(commands, body, status_label, false);
    commands.entity(status).insert(StatusPanel);

    let parts = WatchParts {
        body,
        inventory,
        objective,
        chat,
        status,
        ammo_bars,
        magazine,
        numbered_ammo,
        health,
        infection,
        oxygen,
    };

    commands.entity(root).insert((
        Watch::new(settings.status_refresh_interval()),
        parts,
        RadialMenu::watch_menu(settings.radial_info_text),
    ));

    info!("Watch spawned");
    root
}

pub(crate) fn setup_watch(mut commands: Commands, settings: Res<WatchSettings>) {
    spawn_watch(&mut commands, &settings);
}

/// Per-Frame Button Edges: Radial Menu Held Open, Mode Button Advances
pub(crate) fn poll_watch_input(
    actions: Res<ButtonInput<WatchAction>>,
    mut q_menu: Query<&mut RadialMenu>,
    mut requests: MessageWriter<ModeRequest>,
) {
    if actions.just_pressed(WatchAction::RadialMenu) {
        for mut menu in &mut q_menu {
            menu.show();
        }
    }
    if actions.just_released(WatchAction::RadialMenu) {
        for mut menu in &mut q_menu {
            menu.hide();
        }
    }
    if actions.just_pressed(WatchAction::ToggleMode) {
        requests.write(ModeRequest::Advance { manual: true });
    }
}

pub(crate) fn handle_mode_requests(
    mut requests: MessageReader<ModeRequest>,
    settings: Res<WatchSettings>,
    mut q_watch: Query<&mut Watch>,
    mut haptics: MessageWriter<HapticPulse>,
) {
    for request in requests.read() {
        for mut watch in &mut q_watch {
            watch.set_refresh_interval(settings.status_refresh_interval());
            match *request {
                ModeRequest::Switch(mode) => watch.switch_mode(mode),
                ModeRequest::Advance { .. } => {
                    watch.advance_mode(settings.chat_on_watch);
                }
                ModeRequest::Reapply => {
                    let mode = watch.mode();
                    watch.switch_mode(mode);
                }
            }
        }

        if matches!(request, ModeRequest::Advance { manual: true }) {
            haptics.write(HapticPulse::MODE_ADVANCE);
        }
    }
}

/// Re-Renders the Team Status Whenever the Watch's Loop Says So
pub(crate) fn refresh_team_status(
    time: Res<Time>,
    mut q_watch: Query<(&mut Watch, &WatchParts)>,
    q_agents: Query<(&PlayerAgent, &AgentDamage, Option<&PlayerBackpack>)>,
    mut q_labels: Query<&mut RichLabel>,
) {
    for (mut watch, parts) in &mut q_watch {
        if !watch.poll_status_refresh(time.delta()) {
            continue;
        }
        let Ok(mut label) = q_labels.get_mut(parts.status) else {
            continue;
        };

        let snapshots = collect_snapshots(q_agents.iter());
        label.set_markup(render_team_status(&snapshots));
    }
}

fn set_visible(q_vis: &mut Query<&mut Visibility>, e: Entity, on: bool) {
    if let Ok(mut vis) = q_vis.get_mut(e) {
        vis.set_if_neq(if on { Visibility::Inherited } else { Visibility::Hidden });
    }
}

fn set_rendering(q_bars: &mut Query<&mut DividedBar>, e: Entity, on: bool) {
    if let Ok(mut bar) = q_bars.get_mut(e) {
        if bar.rendering != on {
            bar.toggle_rendering(on);
        }
    }
}

/// Shows the Active Face and Hides the Rest
pub(crate) fn apply_watch_mode_visuals(
    settings: Res<WatchSettings>,
    q_watch: Query<(&Watch, &WatchParts)>,
    mut q_vis: Query<&mut Visibility>,
    mut q_bars: Query<&mut DividedBar>,
) {
    for (watch, parts) in &q_watch {
        let mode = watch.mode();
        let inventory = mode == WatchMode::Inventory;

        set_visible(&mut q_vis, parts.inventory, inventory);
        set_visible(&mut q_vis, parts.objective, mode == WatchMode::Objective);
        set_visible(&mut q_vis, parts.chat, mode == WatchMode::Chat);
        set_visible(&mut q_vis, parts.status, mode == WatchMode::Status);

        let numbers = settings.use_numbers_for_ammo;
        set_visible(&mut q_vis, parts.numbered_ammo, inventory && numbers);
        set_rendering(&mut q_bars, parts.magazine, inventory && !numbers);

        // Vitals that only matter when they're not nominal
        set_rendering(&mut q_bars, parts.infection, inventory && watch.vitals.infection >= 0.01);
        set_rendering(&mut q_bars, parts.oxygen, inventory && watch.vitals.oxygen < 0.95);
    }
}

/// Stops the Refresh Loop Before the Watch Disappears
pub(crate) fn teardown_watches(
    mut commands: Commands,
    mut requests: MessageReader<TeardownWatch>,
    mut q_watch: Query<&mut Watch>,
) {
    for TeardownWatch(e) in requests.read() {
        let Ok(mut watch) = q_watch.get_mut(*e) else {
            continue;
        };
        watch.teardown();
        commands.entity(*e).despawn();
        info!("Watch torn down");
    }
}
