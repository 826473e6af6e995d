/*
Wristwatch - Wrist Watch HUD
*/
use bevy::prelude::*;
use rand::RngExt;

use watchlib::audio::{HapticPulse, WatchAudioPlugin};
use watchlib::objective::ObjectiveProgression;
use watchlib::settings::WatchSettings;
use watchlib::team::{
    AgentDamage,
    AmmoStorage,
    InventorySlot,
    ItemInstance,
    PlayerAgent,
    PlayerBackpack,
    SlotAmmo,
};
use watchlib::ui::{
    ChatMessageReceived,
    InventoryAmmoUpdated,
    ItemWielded,
    LocalVitalsUpdated,
    ObjectivesUpdated,
    WatchPlugin,
    WieldedItem,
};

const DEMO_CHAT: [&str; 5] = [
    "Dauda: need ammo",
    "Hackett: scan done, go",
    "Bishop: sentry up at the door",
    "Dauda: need ammo",
    "Woods: bioscan on the left",
];

const WATCH_COLORS: [&str; 3] = ["#FFFFFF", "#E0A030", "#30A0E0"];

#[derive(Resource)]
struct DemoClock {
    drift: Timer,
    chat: Timer,
    next_chat: usize,
}

impl Default for DemoClock {
    fn default() -> Self {
        Self {
            drift: Timer::from_seconds(1.0, TimerMode::Repeating),
            chat: Timer::from_seconds(4.0, TimerMode::Repeating),
            next_chat: 0,
        }
    }
}

fn main() {
    App::new()
        .add_plugins(DefaultPlugins)
        .insert_resource(WatchSettings::load())
        .init_resource::<DemoClock>()
        .add_plugins((WatchPlugin, WatchAudioPlugin))
        .add_systems(Startup, setup_demo)
        .add_systems(Update, (drift_team, demo_chat, demo_settings_keys, log_haptics))
        .run();
}

fn backpack(pack: &str, consumable: &str, tool: &str) -> PlayerBackpack {
    let mut ammo = AmmoStorage {
        resource_pack_rel: 1.0,
        ..Default::default()
    };
    for (slot, cap, clip) in [
        (InventorySlot::GearStandard, 300, 30),
        (InventorySlot::GearSpecial, 48, 12),
        (InventorySlot::GearClass, 100, 100),
    ] {
        ammo.slots.insert(
            slot,
            SlotAmmo { rel_in_pack: 0.6, bullets_max_cap: cap, bullet_clip_size: clip },
        );
        ammo.clips.insert(slot, clip);
    }

    let mut items = std::collections::HashMap::new();
    items.insert(InventorySlot::GearClass, ItemInstance::new(tool, tool));
    items.insert(InventorySlot::ResourcePack, ItemInstance::new(pack, pack));
    items.insert(InventorySlot::Consumable, ItemInstance::new(consumable, consumable));

    PlayerBackpack { ammo: Some(ammo), items }
}

fn setup_demo(
    mut commands: Commands,
    mut objectives: MessageWriter<ObjectivesUpdated>,
    mut wielded: MessageWriter<ItemWielded>,
    mut ammo: MessageWriter<InventoryAmmoUpdated>,
) {
    commands.spawn(Camera2d);

    commands.spawn((
        PlayerAgent { name: "Woods".into(), slot_index: 0, locally_owned: true },
        AgentDamage { health: 0.25, infection: 0.0 },
        backpack("Medipack", "Glow Stick", "D-tek Optron IV"),
    ));
    for (slot_index, name, pack, consumable, tool) in [
        (1, "Dauda", "Ammo Pack", "C-Foam Grenade", "Mechatronic SGB3"),
        (2, "Hackett", "Tool Refill Pack", "Fog Repeller", "Krieger O4"),
        (3, "Bishop", "Disinfection Pack", "", "D-tek Optron IV"),
    ] {
        commands.spawn((
            PlayerAgent { name: name.into(), slot_index, locally_owned: false },
            AgentDamage { health: 0.25, infection: 0.0 },
            backpack(pack, consumable, tool),
        ));
    }

    objectives.write(ObjectivesUpdated(vec![
        ObjectiveProgression {
            header: Some("<indent=5%>MAIN OBJECTIVE".into()),
            text: Some("<indent=5%>Retrieve the HSU from ZONE_51".into()),
        },
        ObjectiveProgression {
            header: None,
            text: Some("\nFind a way to the extraction zone".into()),
        },
    ]));

    wielded.write(ItemWielded(WieldedItem {
        slot: InventorySlot::GearStandard,
        shootable: true,
        max_clip: 30,
        current_clip: 30,
    }));
    ammo.write(InventoryAmmoUpdated {
        slot: InventorySlot::GearStandard,
        bullets_max_cap: 300,
        rel_in_pack: 0.6,
        bullet_clip_size: 30,
        clip_left: 30,
    });

    info!("Tab cycles faces, hold Q for the radial menu, 1/2/3/4 toggle settings");
}

/// Random Wear on Everyone, Just to Have Something Moving
fn drift_team(
    time: Res<Time>,
    mut clock: ResMut<DemoClock>,
    mut q_agents: Query<(&PlayerAgent, &mut AgentDamage, &mut PlayerBackpack)>,
    mut vitals: MessageWriter<LocalVitalsUpdated>,
    mut ammo_updates: MessageWriter<InventoryAmmoUpdated>,
) {
    if !clock.drift.tick(time.delta()).just_finished() {
        return;
    }

    let mut rng = rand::rng();
    for (agent, mut damage, mut backpack) in &mut q_agents {
        damage.health = (damage.health - rng.random_range(0.0..0.02)).max(0.02);
        damage.infection = (damage.infection + rng.random_range(0.0..0.03)).min(1.0);

        let Some(storage) = backpack.ammo.as_mut() else {
            continue;
        };
        let clip = storage.clip_ammo(InventorySlot::GearStandard);
        let spent = rng.random_range(0..=3).min(clip);
        storage.clips.insert(InventorySlot::GearStandard, clip - spent);

        if agent.locally_owned {
            vitals.write(LocalVitalsUpdated::Health(damage.health * 4.0));
            vitals.write(LocalVitalsUpdated::Infection(damage.infection));
            vitals.write(LocalVitalsUpdated::Air(rng.random_range(0.3..1.0)));

            if let Some(slot) = storage.slot_ammo(InventorySlot::GearStandard) {
                ammo_updates.write(InventoryAmmoUpdated {
                    slot: InventorySlot::GearStandard,
                    bullets_max_cap: slot.bullets_max_cap,
                    rel_in_pack: slot.rel_in_pack,
                    bullet_clip_size: slot.bullet_clip_size,
                    clip_left: clip - spent,
                });
            }
        }
    }
}

fn demo_chat(
    time: Res<Time>,
    mut clock: ResMut<DemoClock>,
    mut chat: MessageWriter<ChatMessageReceived>,
) {
    if !clock.chat.tick(time.delta()).just_finished() {
        return;
    }
    let line = DEMO_CHAT[clock.next_chat % DEMO_CHAT.len()];
    clock.next_chat += 1;
    chat.write(ChatMessageReceived(line.to_string()));
}

fn demo_settings_keys(keys: Res<ButtonInput<KeyCode>>, mut settings: ResMut<WatchSettings>) {
    if keys.just_pressed(KeyCode::Digit1) {
        settings.use_numbers_for_ammo = !settings.use_numbers_for_ammo;
    }
    if keys.just_pressed(KeyCode::Digit2) {
        settings.use_left_hand = !settings.use_left_hand;
    }
    if keys.just_pressed(KeyCode::Digit3) {
        let i = WATCH_COLORS
            .iter()
            .position(|c| *c == settings.watch_color)
            .map_or(0, |i| (i + 1) % WATCH_COLORS.len());
        settings.watch_color = WATCH_COLORS[i].to_string();
    }
    if keys.just_pressed(KeyCode::Digit4) {
        settings.chat_on_watch = !settings.chat_on_watch;
    }
}

fn log_haptics(mut pulses: MessageReader<HapticPulse>) {
    for p in pulses.read() {
        debug!(
            "Haptic: {}s @ {}Hz x{}",
            p.duration_secs, p.frequency, p.amplitude
        );
    }
}
