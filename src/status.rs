/*
Wristwatch - Wrist Watch HUD
*/
use std::fmt::Write as _;

use crate::team::{AgentDamage, InventorySlot, PlayerAgent, PlayerBackpack};

/// Seconds Between Team Status Refreshes While the Panel is Up
pub const STATUS_REFRESH_SECS: f32 = 0.25;

/// Sentry Public Names Aren't Specific Enough on Their Own,
/// so Map Them to What the Type Actually Is
pub const TOOL_NAME_MAP: [(&str, &str); 7] = [
    ("RAD Labs Meduza", "HEL Auto Sentry"),
    ("Mechatronic SGB3", "Burst Sentry"),
    ("Autotek 51 RSG", "Sniper Sentry"),
    ("Mechatronic B5 LFR", "Shotgun Sentry"),
    ("Krieger O4", "Mine Deployer"),
    ("Stalwart Flow G2", "C-Foam Launcher"),
    ("D-tek Optron IV", "Bio Tracker"),
];

/// Name Colors for 2nd / 3rd / 4th Party Slots
pub const NAME_COLORS: [&str; 3] = [
    "#18935E", // Dauda
    "#20558C", // Hackett
    "#7A1A8E", // Bishop
];

/// Used Past the 4th Player (Lobby Expansion Mods)
pub const FALLBACK_NAME_COLOR: &str = "#66CCFF";

/// Tool That Has No Ammo to Report
pub const NON_AMMO_TOOL: &str = "Bio Tracker";

const DIVIDER: &str = "---------------------------<br>";

const GREEN: &str = "#00FF00";
const YELLOW: &str = "#FFFF00";
const ORANGE: &str = "#FFA500";
const RED: &str = "#FF0000";
const WHITE: &str = "#FFFFFF";

/// Half-to-Even, Same as the Game's Own Percent Rounding
#[inline]
fn round_to_int(v: f32) -> i32 {
    v.round_ties_even() as i32
}

pub fn health_percent(raw: f32) -> i32 {
    round_to_int(raw * 4.0 * 100.0).clamp(0, 100)
}

pub fn infection_percent(raw: f32) -> i32 {
    round_to_int(raw * 100.0).clamp(0, 100)
}

/// Clip + Reserve Over Max Capacity
pub fn ammo_percent(reserve_fraction: f32, capacity: i32, clip: i32) -> i32 {
    if capacity <= 0 {
        return 0;
    }
    let max = capacity as f32;
    let total = reserve_fraction * max + clip as f32;
    round_to_int(total / max * 100.0)
}

/// 0 - 120% Pack Range Into 0 - 6 Display Units
pub fn pack_units(pack_percent: i32) -> u8 {
    round_to_int(pack_percent as f32 / 20.0).clamp(0, 6) as u8
}

pub fn tool_display_name(public_name: &str) -> &str {
    TOOL_NAME_MAP
        .iter()
        .find(|(public, _)| *public == public_name)
        .map(|(_, display)| *display)
        .unwrap_or(public_name)
}

pub fn name_color(index: usize) -> &'static str {
    NAME_COLORS.get(index).copied().unwrap_or(FALLBACK_NAME_COLOR)
}

/// HP / Ammo Palette
pub fn hp_or_ammo_color(pct: i32) -> &'static str {
    if pct > 80 {
        GREEN
    } else if pct >= 50 {
        YELLOW
    } else if pct >= 20 {
        ORANGE
    } else {
        RED
    }
}

/// Infection Palette (White While Low)
pub fn infection_color(pct: i32) -> &'static str {
    if pct < 20 {
        WHITE
    } else if pct < 50 {
        YELLOW
    } else if pct < 90 {
        ORANGE
    } else {
        RED
    }
}

/// Ephemeral View of One Teammate, Rebuilt Every Refresh
#[derive(Debug, Clone, PartialEq)]
pub struct TeammateSnapshot {
    pub player_name: String,
    pub health_pct: i32,
    pub infection_pct: i32,
    /// 'None' When the Slot Has No Ammo Record
    pub primary_ammo_pct: Option<i32>,
    pub secondary_ammo_pct: Option<i32>,
    pub tool_ammo_pct: Option<i32>,
    pub tool_display_name: String,
    pub resource_pack: Option<(String, u8)>,
    pub consumable_name: Option<String>,
}

fn carried_name(name: Option<&str>) -> Option<String> {
    name.map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
}

impl TeammateSnapshot {
    /// 'None' for the Local Player or a Teammate Without a Backpack
    pub fn capture(
        agent: &PlayerAgent,
        damage: &AgentDamage,
        backpack: Option<&PlayerBackpack>,
    ) -> Option<Self> {
        if agent.locally_owned {
            return None;
        }
        let backpack = backpack?;

        let slot_pct = |slot: InventorySlot| {
            let ammo = backpack.ammo.as_ref()?;
            let slot_ammo = ammo.slot_ammo(slot)?;
            Some(ammo_percent(
                slot_ammo.rel_in_pack,
                slot_ammo.bullets_max_cap,
                ammo.clip_ammo(slot),
            ))
        };

        let tool_public = backpack
            .item(InventorySlot::GearClass)
            .map(|i| i.public_name.as_str())
            .unwrap_or("Tool");

        let pack_name = carried_name(
            backpack
                .item(InventorySlot::ResourcePack)
                .map(|i| i.archetype_name.as_str()),
        );
        let pack_pct = backpack
            .ammo
            .as_ref()
            .map(|a| round_to_int(a.resource_pack_rel * 100.0))
            .unwrap_or(-1);

        Some(Self {
            player_name: agent.name.clone(),
            health_pct: health_percent(damage.health),
            infection_pct: infection_percent(damage.infection),
            primary_ammo_pct: slot_pct(InventorySlot::GearStandard),
            secondary_ammo_pct: slot_pct(InventorySlot::GearSpecial),
            tool_ammo_pct: slot_pct(InventorySlot::GearClass),
            tool_display_name: tool_display_name(tool_public).to_string(),
            resource_pack: pack_name.map(|name| (name, pack_units(pack_pct))),
            consumable_name: carried_name(
                backpack
                    .item(InventorySlot::Consumable)
                    .map(|i| i.archetype_name.as_str()),
            ),
        })
    }

    fn shows_tool_ammo(&self) -> bool {
        !self
            .tool_display_name
            .to_ascii_lowercase()
            .contains(&NON_AMMO_TOOL.to_ascii_lowercase())
    }

    /// Appends This Teammate's Block of Markup
    pub fn write_markup(&self, out: &mut String, name_color: &str) {
        // Writing Into a String Can't Fail
        let _ = write!(
            out,
            "<size=32><b><u><color={name_color}>{}</color></u></b> | <color={}>HP: {}%</color></size><br>",
            self.player_name,
            hp_or_ammo_color(self.health_pct),
            self.health_pct,
        );

        if self.infection_pct > 0 {
            let _ = write!(
                out,
                "<b><size=26><color={}>INFECTION: {}%</color></size></b><br>",
                infection_color(self.infection_pct),
                self.infection_pct,
            );
        }

        out.push_str("<size=26>PRI:</size> ");
        push_weapon_pct(out, self.primary_ammo_pct);
        out.push_str(" | <size=26>SEC:</size> ");
        push_weapon_pct(out, self.secondary_ammo_pct);
        out.push_str("<br>");

        out.push_str("<size=26>");
        out.push_str(&self.tool_display_name);
        if self.shows_tool_ammo() {
            match self.tool_ammo_pct {
                Some(pct) => {
                    let _ = write!(out, ": <color={}>{pct}%</color>", hp_or_ammo_color(pct));
                }
                None => out.push_str(": N/A"),
            }
        }
        out.push_str("</size><br>");

        if let Some((pack, units)) = &self.resource_pack {
            let _ = write!(out, "<size=24>{pack}: {units}</size>");
        }
        if let Some(consumable) = &self.consumable_name {
            if self.resource_pack.is_some() {
                out.push_str(" | ");
            }
            // No size tag, it auto-sizes (least important info)
            out.push_str(consumable);
        }
        if self.resource_pack.is_some() || self.consumable_name.is_some() {
            out.push_str("<br>");
        }
    }
}

fn push_weapon_pct(out: &mut String, pct: Option<i32>) {
    match pct {
        Some(pct) => {
            let _ = write!(
                out,
                "<b><size=28><color={}>{pct}%</color></size></b>",
                hp_or_ammo_color(pct)
            );
        }
        None => out.push_str("<b><size=28>N/A</size></b>"),
    }
}

/// Renders Every Teammate Into One Markup String
/// Dividers Follow the 1st and 2nd Blocks, Never the Last One
pub fn render_team_status(snapshots: &[TeammateSnapshot]) -> String {
    let mut out = String::with_capacity(512);
    for (index, snapshot) in snapshots.iter().enumerate() {
        snapshot.write_markup(&mut out, name_color(index));

        let is_last = index + 1 == snapshots.len();
        if index < 2 && !is_last {
            out.push_str(DIVIDER);
        }
    }
    out
}

/// Captures Snapshots in Party Slot Order, Skipping Anyone We Can't Read
pub fn collect_snapshots<'a>(
    agents: impl IntoIterator<Item = (&'a PlayerAgent, &'a AgentDamage, Option<&'a PlayerBackpack>)>,
) -> Vec<TeammateSnapshot> {
    let mut agents: Vec<_> = agents.into_iter().collect();
    agents.sort_by_key(|(agent, _, _)| agent.slot_index);
    agents
        .into_iter()
        .filter_map(|(agent, damage, backpack)| TeammateSnapshot::capture(agent, damage, backpack))
        .collect()
}
