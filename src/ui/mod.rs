/*
Wristwatch - Wrist Watch HUD
*/
use bevy::prelude::*;

mod hud;
pub mod markup;
pub mod radial;
pub mod refresh;
mod state;
mod sync;
pub mod widgets;

pub use hud::{spawn_watch, WatchParts};
pub use radial::{EnterChatMode, RadialItemSelected, RadialMenu};
pub use state::{LocalVitals, Watch, WatchMode, WieldedItem};
pub use sync::{
    ChatMessageReceived,
    InventoryAmmoUpdated,
    ItemWielded,
    LocalVitalsUpdated,
    ObjectivesUpdated,
};

use crate::audio::{HapticPulse, PlayUiSound};
use crate::input::{map_watch_bindings, WatchAction};
use crate::settings::{detect_setting_changes, WatchSettingChanged, WatchSettings};

/// Ways to Move the Watch Between Faces
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeRequest {
    Switch(WatchMode),
    /// Next Face in the Cycle; Manual Ones Buzz the Controller
    Advance { manual: bool },
    /// Re-Enter the Current Face (Display Settings Changed)
    Reapply,
}

/// Cancel the Watch's Loops and Despawn It
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct TeardownWatch(pub Entity);

#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WatchSystems {
    Input,
    Settings,
    Modes,
    Bridges,
    Render,
}

pub struct WatchPlugin;

impl Plugin for WatchPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WatchSettings>()
            .init_resource::<ButtonInput<WatchAction>>()
            .add_message::<ModeRequest>()
            .add_message::<TeardownWatch>()
            .add_message::<WatchSettingChanged>()
            .add_message::<HapticPulse>()
            .add_message::<PlayUiSound>()
            .add_message::<ChatMessageReceived>()
            .add_message::<ObjectivesUpdated>()
            .add_message::<ItemWielded>()
            .add_message::<InventoryAmmoUpdated>()
            .add_message::<LocalVitalsUpdated>()
            .add_message::<RadialItemSelected>()
            .add_message::<EnterChatMode>()
            .configure_sets(
                Update,
                (
                    WatchSystems::Input,
                    WatchSystems::Settings,
                    WatchSystems::Modes,
                    WatchSystems::Bridges,
                    WatchSystems::Render,
                )
                    .chain(),
            )
            .add_systems(Startup, hud::setup_watch)
            .add_systems(
                Update,
                (map_watch_bindings, hud::poll_watch_input)
                    .chain()
                    .in_set(WatchSystems::Input),
            )
            .add_systems(
                Update,
                (
                    sync::on_ammo_numbers_changed,
                    sync::on_watch_scale_changed,
                    sync::on_watch_color_changed,
                    sync::on_radial_info_text_changed,
                    sync::on_chat_on_watch_changed,
                    sync::on_handedness_changed,
                )
                    .after(detect_setting_changes)
                    .in_set(WatchSystems::Settings),
            )
            .add_systems(Update, detect_setting_changes.in_set(WatchSystems::Settings))
            .add_systems(
                Update,
                (radial::handle_radial_selection, hud::handle_mode_requests)
                    .chain()
                    .in_set(WatchSystems::Modes),
            )
            .add_systems(
                Update,
                (
                    sync::bridge_chat_messages,
                    sync::bridge_objectives,
                    sync::bridge_item_wielded,
                    sync::bridge_inventory_ammo,
                    sync::bridge_local_vitals,
                )
                    .chain()
                    .in_set(WatchSystems::Bridges),
            )
            .add_systems(
                Update,
                (
                    hud::refresh_team_status,
                    hud::apply_watch_mode_visuals,
                    widgets::sync_divided_bars,
                    widgets::rebuild_rich_labels,
                    hud::teardown_watches,
                )
                    .chain()
                    .in_set(WatchSystems::Render),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objective::ObjectiveProgression;
    use crate::team::{
        AgentDamage,
        AmmoStorage,
        InventorySlot,
        ItemInstance,
        PlayerAgent,
        PlayerBackpack,
        SlotAmmo,
    };
    use hud::WatchBody;
    use markup::plain_text;
    use std::time::Duration;
    use widgets::{BarDivider, BarFill, DividedBar, RichLabel, SpanEmphasis};

    /// Everything a Message Type Carried, Across All Frames
    #[derive(Resource)]
    struct MessageLog<T: Send + Sync + 'static>(Vec<T>);

    impl<T: Send + Sync + 'static> Default for MessageLog<T> {
        fn default() -> Self {
            Self(Vec::new())
        }
    }

    fn record<T: Message + Clone>(mut incoming: MessageReader<T>, mut log: ResMut<MessageLog<T>>) {
        log.0.extend(incoming.read().cloned());
    }

    fn logged<T: Message>(app: &App) -> &[T] {
        &app.world().resource::<MessageLog<T>>().0
    }

    fn test_app(settings: WatchSettings) -> App {
        let mut app = App::new();
        app.insert_resource(settings)
            .init_resource::<Time>()
            .init_resource::<ButtonInput<KeyCode>>()
            .init_resource::<MessageLog<HapticPulse>>()
            .init_resource::<MessageLog<PlayUiSound>>()
            .init_resource::<MessageLog<ModeRequest>>()
            .add_plugins(WatchPlugin)
            .add_systems(
                Last,
                (record::<HapticPulse>, record::<PlayUiSound>, record::<ModeRequest>),
            );
        app.update();
        app
    }

    fn step(app: &mut App, ms: u64) {
        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_millis(ms));
        app.update();
    }

    fn tap(app: &mut App, key: KeyCode) {
        app.world_mut().resource_mut::<ButtonInput<KeyCode>>().press(key);
        step(app, 16);
        {
            let mut keys = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
            keys.clear();
            keys.release(key);
        }
        step(app, 16);
        app.world_mut().resource_mut::<ButtonInput<KeyCode>>().clear();
    }

    fn watch_entity(app: &mut App) -> Entity {
        let mut q = app.world_mut().query_filtered::<Entity, With<Watch>>();
        q.single(app.world()).expect("one watch")
    }

    fn watch(app: &mut App) -> &Watch {
        let e = watch_entity(app);
        app.world().get::<Watch>(e).expect("watch component")
    }

    fn label(app: &mut App, pick: fn(&WatchParts) -> Entity) -> String {
        let e = watch_entity(app);
        let parts = app.world().get::<WatchParts>(e).expect("watch parts");
        let label_e = pick(parts);
        let label = app.world().get::<RichLabel>(label_e).expect("label");
        plain_text(&label.markup)
    }

    fn bar(app: &mut App, pick: fn(&WatchParts) -> Entity) -> DividedBar {
        let e = watch_entity(app);
        let parts = app.world().get::<WatchParts>(e).expect("watch parts");
        let bar_e = pick(parts);
        app.world().get::<DividedBar>(bar_e).expect("bar").clone()
    }

    fn spawn_teammate(app: &mut App, name: &str, slot_index: u8, health: f32) -> Entity {
        let mut ammo = AmmoStorage::default();
        ammo.slots.insert(
            InventorySlot::GearStandard,
            SlotAmmo { rel_in_pack: 0.5, bullets_max_cap: 30, bullet_clip_size: 10 },
        );
        ammo.clips.insert(InventorySlot::GearStandard, 10);

        let mut backpack = PlayerBackpack { ammo: Some(ammo), ..Default::default() };
        backpack
            .items
            .insert(InventorySlot::GearClass, ItemInstance::new("Bio Tracker", "Bio Tracker"));

        app.world_mut()
            .spawn((
                PlayerAgent { name: name.to_string(), slot_index, locally_owned: false },
                AgentDamage { health, infection: 0.0 },
                backpack,
            ))
            .id()
    }

    fn request(app: &mut App, request: ModeRequest) {
        app.world_mut().write_message(request);
        step(app, 0);
    }

    #[test]
    fn starts_on_inventory() {
        let mut app = test_app(WatchSettings::default());
        assert_eq!(watch(&mut app).mode(), WatchMode::Inventory);
        assert!(!watch(&mut app).status_loop_active());
    }

    #[test]
    fn mode_button_cycles_faces() {
        let mut app = test_app(WatchSettings::default());
        let mut seen = Vec::new();
        for _ in 0..4 {
            tap(&mut app, KeyCode::Tab);
            seen.push(watch(&mut app).mode());
        }
        use WatchMode::*;
        assert_eq!(seen, vec![Objective, Chat, Status, Inventory]);

        let pulses = logged::<HapticPulse>(&app);
        assert_eq!(pulses.len(), 4);
        assert!(pulses.iter().all(|p| *p == HapticPulse::MODE_ADVANCE));
    }

    #[test]
    fn mode_button_skips_chat_when_disabled() {
        let settings = WatchSettings { chat_on_watch: false, ..Default::default() };
        let mut app = test_app(settings);
        tap(&mut app, KeyCode::Tab);
        tap(&mut app, KeyCode::Tab);
        assert_eq!(watch(&mut app).mode(), WatchMode::Status);
    }

    #[test]
    fn status_renders_on_entry_then_every_quarter_second() {
        let mut app = test_app(WatchSettings::default());
        let mate = spawn_teammate(&mut app, "Woods", 1, 0.25);
        spawn_teammate(&mut app, "Dauda", 0, 0.25);

        request(&mut app, ModeRequest::Switch(WatchMode::Status));
        let text = label(&mut app, |p| p.status);
        assert!(text.starts_with("Dauda | HP: 100%"));
        assert!(text.contains("Woods | HP: 100%"));
        assert!(text.contains("Bio Tracker\n"));

        app.world_mut().get_mut::<AgentDamage>(mate).expect("damage").health = 0.1;
        step(&mut app, 100);
        assert!(label(&mut app, |p| p.status).contains("Woods | HP: 100%"));
        step(&mut app, 150);
        assert!(label(&mut app, |p| p.status).contains("Woods | HP: 40%"));
    }

    #[test]
    fn no_refresh_after_leaving_status() {
        let mut app = test_app(WatchSettings::default());
        let mate = spawn_teammate(&mut app, "Hackett", 2, 0.25);

        request(&mut app, ModeRequest::Switch(WatchMode::Status));
        request(&mut app, ModeRequest::Switch(WatchMode::Status));
        assert!(watch(&mut app).status_loop_active());

        request(&mut app, ModeRequest::Switch(WatchMode::Inventory));
        assert!(!watch(&mut app).status_loop_active());

        app.world_mut().get_mut::<AgentDamage>(mate).expect("damage").health = 0.05;
        step(&mut app, 300);
        step(&mut app, 300);
        assert!(label(&mut app, |p| p.status).contains("Hackett | HP: 100%"));
    }

    #[test]
    fn chat_keeps_last_eight_distinct_lines() {
        let mut app = test_app(WatchSettings::default());
        for i in 1..=9 {
            app.world_mut()
                .write_message(ChatMessageReceived(format!("msg {i}")));
        }
        app.world_mut()
            .write_message(ChatMessageReceived("msg 9".to_string()));
        step(&mut app, 16);

        let text = label(&mut app, |p| p.chat);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0], "msg 2");
        assert_eq!(lines[7], "msg 9");

        let pulses = logged::<HapticPulse>(&app);
        assert_eq!(pulses.iter().filter(|p| **p == HapticPulse::CHAT).count(), 9);
        let sounds = logged::<PlayUiSound>(&app);
        assert_eq!(sounds.len(), 9);
        assert!(sounds.iter().all(|s| s.kind == crate::audio::UiSoundKind::MenuChangePage));
    }

    #[test]
    fn objectives_strip_indents_and_buzz() {
        let mut app = test_app(WatchSettings::default());
        app.world_mut().write_message(ObjectivesUpdated(vec![ObjectiveProgression {
            header: Some("<indent=10%>MAIN".to_string()),
            text: Some("Find the <indent=5%>key".to_string()),
        }]));
        step(&mut app, 16);

        assert_eq!(label(&mut app, |p| p.objective), "MAIN\nFind the key");
        let pulses = logged::<HapticPulse>(&app);
        assert!(pulses.contains(&HapticPulse::OBJECTIVE));
    }

    #[test]
    fn wielded_gun_drives_magazine_and_numbers() {
        let mut app = test_app(WatchSettings::default());
        app.world_mut().write_message(ItemWielded(WieldedItem {
            slot: InventorySlot::GearSpecial,
            shootable: true,
            max_clip: 12,
            current_clip: 12,
        }));
        step(&mut app, 16);

        let special = bar(&mut app, |p| p.ammo_bars[&InventorySlot::GearSpecial]);
        let standard = bar(&mut app, |p| p.ammo_bars[&InventorySlot::GearStandard]);
        assert!(special.selected);
        assert!(!standard.selected);
        assert_eq!(bar(&mut app, |p| p.magazine).cells, 12);

        app.world_mut().write_message(InventoryAmmoUpdated {
            slot: InventorySlot::GearSpecial,
            bullets_max_cap: 48,
            rel_in_pack: 0.5,
            bullet_clip_size: 12,
            clip_left: 7,
        });
        step(&mut app, 16);

        assert_eq!(label(&mut app, |p| p.numbered_ammo), "7\n----\n24");
        let special = bar(&mut app, |p| p.ammo_bars[&InventorySlot::GearSpecial]);
        assert_eq!(special.current_value, 31);
        assert_eq!(special.cells, 4);
    }

    #[test]
    fn ammo_for_other_slot_leaves_magazine_alone() {
        let mut app = test_app(WatchSettings::default());
        app.world_mut().write_message(ItemWielded(WieldedItem {
            slot: InventorySlot::GearStandard,
            shootable: true,
            max_clip: 30,
            current_clip: 30,
        }));
        step(&mut app, 16);

        app.world_mut().write_message(InventoryAmmoUpdated {
            slot: InventorySlot::ConsumableHeavy,
            bullets_max_cap: 5,
            rel_in_pack: 0.4,
            bullet_clip_size: 1,
            clip_left: 0,
        });
        step(&mut app, 16);

        assert_eq!(label(&mut app, |p| p.numbered_ammo), "");
        assert_eq!(bar(&mut app, |p| p.magazine).current_value, 30);
        let consumable = bar(&mut app, |p| p.ammo_bars[&InventorySlot::Consumable]);
        assert_eq!(consumable.cells, 5);
        assert_eq!(consumable.fill, 0.4);
    }

    #[test]
    fn infection_bar_only_when_infected_on_inventory() {
        let mut app = test_app(WatchSettings::default());
        assert!(!bar(&mut app, |p| p.infection).rendering);

        app.world_mut().write_message(LocalVitalsUpdated::Infection(0.3));
        step(&mut app, 16);
        assert!(bar(&mut app, |p| p.infection).rendering);

        request(&mut app, ModeRequest::Switch(WatchMode::Objective));
        assert!(!bar(&mut app, |p| p.infection).rendering);
    }

    #[test]
    fn disabling_chat_moves_off_chat_face() {
        let mut app = test_app(WatchSettings::default());
        request(&mut app, ModeRequest::Switch(WatchMode::Chat));

        app.world_mut().resource_mut::<WatchSettings>().chat_on_watch = false;
        step(&mut app, 16);
        assert_eq!(watch(&mut app).mode(), WatchMode::Status);

        // Programmatic advance, no buzz
        let pulses = logged::<HapticPulse>(&app);
        assert!(!pulses.contains(&HapticPulse::MODE_ADVANCE));
    }

    #[test]
    fn radial_item_switches_mode() {
        let mut app = test_app(WatchSettings::default());
        app.world_mut().write_message(RadialItemSelected(4));
        step(&mut app, 16);
        assert_eq!(watch(&mut app).mode(), WatchMode::Status);
    }

    #[test]
    fn radial_menu_follows_button() {
        let mut app = test_app(WatchSettings::default());
        app.world_mut().resource_mut::<ButtonInput<KeyCode>>().press(KeyCode::KeyQ);
        step(&mut app, 16);

        let e = watch_entity(&mut app);
        assert!(app.world().get::<RadialMenu>(e).expect("menu").visible);

        {
            let mut keys = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
            keys.clear();
            keys.release(KeyCode::KeyQ);
        }
        step(&mut app, 16);
        assert!(!app.world().get::<RadialMenu>(e).expect("menu").visible);
    }

    #[test]
    fn teardown_despawns_watch() {
        let mut app = test_app(WatchSettings::default());
        request(&mut app, ModeRequest::Switch(WatchMode::Status));
        let e = watch_entity(&mut app);

        app.world_mut().write_message(TeardownWatch(e));
        step(&mut app, 16);
        assert!(app.world().get_entity(e).is_err());
    }

    fn parts(app: &mut App) -> WatchParts {
        let e = watch_entity(app);
        app.world().get::<WatchParts>(e).expect("watch parts").clone()
    }

    fn root_node(app: &mut App) -> Node {
        let e = watch_entity(app);
        app.world().get::<Node>(e).expect("root node").clone()
    }

    fn children_of(app: &App, e: Entity) -> Vec<Entity> {
        app.world()
            .get::<Children>(e)
            .map(|c| c.iter().collect())
            .unwrap_or_default()
    }

    #[test]
    fn status_markup_becomes_styled_spans() {
        let mut app = test_app(WatchSettings::default());
        spawn_teammate(&mut app, "Dauda", 0, 0.25);
        request(&mut app, ModeRequest::Switch(WatchMode::Status));

        let status = parts(&mut app).status;
        let spans = children_of(&app, status);
        assert!(!spans.is_empty());

        let first = spans[0];
        let world = app.world();
        assert_eq!(world.get::<TextSpan>(first).expect("span").0, "Dauda");
        // Markup size 32 at the default 0.5 label scale
        assert_eq!(world.get::<TextFont>(first).expect("font").font_size, 16.0);
        let name_color = Srgba::hex("#18935E").expect("hex");
        assert_eq!(world.get::<TextColor>(first).expect("color").0.to_srgba(), name_color);
        let emphasis = world.get::<SpanEmphasis>(first).expect("emphasis");
        assert!(emphasis.bold && emphasis.underline);

        // Re-render replaces the spans rather than stacking them
        let count = spans.len();
        step(&mut app, 250);
        assert_eq!(children_of(&app, status).len(), count);
    }

    #[test]
    fn bar_fill_and_dividers_follow_state() {
        let mut app = test_app(WatchSettings::default());
        app.world_mut().write_message(InventoryAmmoUpdated {
            slot: InventorySlot::ResourcePack,
            bullets_max_cap: 5,
            rel_in_pack: 0.5,
            bullet_clip_size: 1,
            clip_left: 0,
        });
        step(&mut app, 16);

        let pack = parts(&mut app).ammo_bars[&InventorySlot::ResourcePack];
        let children = children_of(&app, pack);
        let world = app.world();
        let fill = children
            .iter()
            .find(|e| world.get::<BarFill>(**e).is_some())
            .expect("fill node");
        assert_eq!(world.get::<Node>(*fill).expect("node").width, Val::Percent(50.0));
        let dividers = children
            .iter()
            .filter(|e| world.get::<BarDivider>(**e).is_some())
            .count();
        assert_eq!(dividers, 4);
    }

    #[test]
    fn hidden_bar_follows_rendering_flag() {
        let mut app = test_app(WatchSettings::default());
        let infection = parts(&mut app).infection;
        assert_eq!(app.world().get::<Visibility>(infection), Some(&Visibility::Hidden));

        app.world_mut().write_message(LocalVitalsUpdated::Infection(0.3));
        step(&mut app, 16);
        assert_eq!(app.world().get::<Visibility>(infection), Some(&Visibility::Inherited));
    }

    #[test]
    fn bad_refresh_values_written_at_runtime_are_clamped() {
        let mut app = test_app(WatchSettings::default());

        app.world_mut().resource_mut::<WatchSettings>().status_refresh_secs = -0.25;
        request(&mut app, ModeRequest::Switch(WatchMode::Status));
        assert!(watch(&mut app).status_loop_active());
        assert_eq!(app.world().resource::<WatchSettings>().status_refresh_secs, 0.05);

        request(&mut app, ModeRequest::Switch(WatchMode::Inventory));
        app.world_mut().resource_mut::<WatchSettings>().status_refresh_secs = f32::NAN;
        request(&mut app, ModeRequest::Switch(WatchMode::Status));
        assert!(watch(&mut app).status_loop_active());
        assert_eq!(app.world().resource::<WatchSettings>().status_refresh_secs, 0.25);
    }

    #[test]
    fn scale_change_resizes_watch_and_labels() {
        let mut app = test_app(WatchSettings::default());
        app.world_mut().resource_mut::<WatchSettings>().watch_scale = 2.0;
        step(&mut app, 16);

        assert_eq!(root_node(&mut app).width, Val::Px(550.0));
        let status = parts(&mut app).status;
        let scale = app.world().get::<RichLabel>(status).expect("label").scale;
        assert!((scale - 1.0).abs() < 1e-6);

        app.world_mut().resource_mut::<WatchSettings>().watch_scale = -3.0;
        step(&mut app, 16);
        assert_eq!(app.world().resource::<WatchSettings>().watch_scale, 0.25);
        assert_eq!(root_node(&mut app).width, Val::Px(68.75));
    }

    #[test]
    fn color_change_tints_body_and_ignores_bad_hex() {
        let mut app = test_app(WatchSettings::default());
        let red = Srgba::new(1.0, 0.0, 0.0, 0.25);

        app.world_mut().resource_mut::<WatchSettings>().watch_color = "#FF0000".into();
        step(&mut app, 16);
        let body = parts(&mut app).body;
        assert_eq!(app.world().get::<BackgroundColor>(body).expect("bg").0.to_srgba(), red);

        app.world_mut().resource_mut::<WatchSettings>().watch_color = "not a color".into();
        step(&mut app, 16);
        assert_eq!(app.world().get::<BackgroundColor>(body).expect("bg").0.to_srgba(), red);

        let mut q = app.world_mut().query_filtered::<Entity, With<WatchBody>>();
        assert_eq!(q.iter(app.world()).count(), 1);
    }

    #[test]
    fn bad_start_color_falls_back_to_white() {
        let settings = WatchSettings { watch_color: "teal-ish".into(), ..Default::default() };
        let mut app = test_app(settings);
        let body = parts(&mut app).body;
        let bg = app.world().get::<BackgroundColor>(body).expect("bg").0.to_srgba();
        assert_eq!(bg, Srgba::new(1.0, 1.0, 1.0, 0.25));
    }

    #[test]
    fn handedness_moves_watch_to_other_edge() {
        let mut app = test_app(WatchSettings::default());
        assert_eq!(root_node(&mut app).left, Val::Px(8.0));

        app.world_mut().resource_mut::<WatchSettings>().use_left_hand = true;
        step(&mut app, 16);
        let node = root_node(&mut app);
        assert_eq!(node.left, Val::Auto);
        assert_eq!(node.right, Val::Px(8.0));
    }

    #[test]
    fn radial_info_text_follows_setting() {
        let mut app = test_app(WatchSettings::default());
        app.world_mut().resource_mut::<WatchSettings>().radial_info_text = false;
        step(&mut app, 16);

        let e = watch_entity(&mut app);
        assert!(!app.world().get::<RadialMenu>(e).expect("menu").info_text_visible);
    }

    #[test]
    fn ammo_numbers_toggle_reapplies_mode() {
        let mut app = test_app(WatchSettings::default());
        let p = parts(&mut app);
        assert!(app.world().get::<DividedBar>(p.magazine).expect("bar").rendering);

        app.world_mut().resource_mut::<WatchSettings>().use_numbers_for_ammo = true;
        step(&mut app, 16);

        assert!(logged::<ModeRequest>(&app).contains(&ModeRequest::Reapply));
        assert_eq!(watch(&mut app).mode(), WatchMode::Inventory);
        assert!(!app.world().get::<DividedBar>(p.magazine).expect("bar").rendering);
        assert_eq!(
            app.world().get::<Visibility>(p.numbered_ammo),
            Some(&Visibility::Inherited)
        );
    }
}
