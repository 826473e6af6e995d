/*
Wristwatch - Wrist Watch HUD
*/
use bevy::prelude::*;
use std::collections::HashMap;

/// Categorical Inventory Bucket
/// Order Matches the Game's Backpack Slot Layout
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InventorySlot {
    GearStandard,
    GearSpecial,
    GearClass,
    ResourcePack,
    Consumable,
    ConsumableHeavy,
    Melee,
    HackingTool,
}

impl InventorySlot {
    /// Slots Whose Bar Tracks Magazines (Primary / Secondary)
    pub fn is_weapon(self) -> bool {
        matches!(self, Self::GearStandard | Self::GearSpecial)
    }

    /// Slots Whose Bar Tracks Uses Rather Than Bullets
    pub fn is_pack_or_consumable(self) -> bool {
        matches!(self, Self::ResourcePack | Self::Consumable | Self::ConsumableHeavy)
    }
}

/// One Player in the Level (Local or Remote)
/// Already Synchronized by the Game's Netcode, We Only Read It
#[derive(Component, Debug, Clone)]
pub struct PlayerAgent {
    pub name: String,
    /// Party Slot (0 - 3), Gives Stable Iteration Order
    pub slot_index: u8,
    pub locally_owned: bool,
}

/// Raw Damage Model Values
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct AgentDamage {
    /// 0.0 ..= 0.25 (0.25 is Full Health)
    pub health: f32,
    /// 0.0 ..= 1.0
    pub infection: f32,
}

#[derive(Debug, Clone)]
pub struct ItemInstance {
    /// Marketing Name (e.g. "Mechatronic SGB3")
    pub public_name: String,
    /// Generic Name (e.g. "Medipack", "C-Foam Grenade")
    pub archetype_name: String,
}

impl ItemInstance {
    pub fn new(public_name: impl Into<String>, archetype_name: impl Into<String>) -> Self {
        Self {
            public_name: public_name.into(),
            archetype_name: archetype_name.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotAmmo {
    /// Reserve Held Outside the Clip, as a Fraction of 'bullets_max_cap'
    pub rel_in_pack: f32,
    pub bullets_max_cap: i32,
    pub bullet_clip_size: i32,
}

#[derive(Debug, Clone, Default)]
pub struct AmmoStorage {
    pub slots: HashMap<InventorySlot, SlotAmmo>,
    pub clips: HashMap<InventorySlot, i32>,
    /// 0.0 ..= 1.2 (Packs Hold up to 120%)
    pub resource_pack_rel: f32,
}

impl AmmoStorage {
    pub fn slot_ammo(&self, slot: InventorySlot) -> Option<&SlotAmmo> {
        self.slots.get(&slot)
    }

    pub fn clip_ammo(&self, slot: InventorySlot) -> i32 {
        self.clips.get(&slot).copied().unwrap_or(0)
    }
}

/// A Player's Carried Gear
#[derive(Component, Debug, Clone, Default)]
pub struct PlayerBackpack {
    pub ammo: Option<AmmoStorage>,
    pub items: HashMap<InventorySlot, ItemInstance>,
}

impl PlayerBackpack {
    pub fn item(&self, slot: InventorySlot) -> Option<&ItemInstance> {
        self.items.get(&slot)
    }
}
