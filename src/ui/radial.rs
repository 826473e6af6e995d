/*
Wristwatch - Wrist Watch HUD
*/
use bevy::prelude::*;

use super::state::WatchMode;
use super::ModeRequest;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RadialAction {
    Switch(WatchMode),
    TypeInChat,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RadialItem {
    pub id: &'static str,
    pub info_text: &'static str,
    pub action: RadialAction,
}

/// Radial Menu Attached to the Watch
/// Layout and Icons Belong to the Menu Renderer, This is Just the State
#[derive(Component, Debug, Clone)]
pub struct RadialMenu {
    pub items: Vec<RadialItem>,
    pub visible: bool,
    pub info_text_visible: bool,
}

impl RadialMenu {
    pub fn watch_menu(info_text_visible: bool) -> Self {
        let item = |id, info_text, action| RadialItem { id, info_text, action };
        Self {
            items: vec![
                item("Inventory", "Inventory", RadialAction::Switch(WatchMode::Inventory)),
                item("Objective", "Objective", RadialAction::Switch(WatchMode::Objective)),
                item("ChatType", "Type In Chat", RadialAction::TypeInChat),
                item("Chat", "Chat", RadialAction::Switch(WatchMode::Chat)),
                item("Status", "Team Status", RadialAction::Switch(WatchMode::Status)),
            ],
            visible: false,
            info_text_visible,
        }
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn toggle_all_info_text(&mut self, on: bool) {
        self.info_text_visible = on;
    }

    pub fn item(&self, index: usize) -> Option<&RadialItem> {
        self.items.get(index)
    }
}

/// Pointer Picked an Item (Index Into 'RadialMenu::items')
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct RadialItemSelected(pub usize);

/// Ask the Game to Open its Chat Input
#[derive(Message, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EnterChatMode;

pub fn handle_radial_selection(
    mut selected: MessageReader<RadialItemSelected>,
    q_menu: Query<&RadialMenu>,
    mut requests: MessageWriter<ModeRequest>,
    mut chat: MessageWriter<EnterChatMode>,
) {
    let Some(menu) = q_menu.iter().next() else {
        selected.clear();
        return;
    };

    for RadialItemSelected(index) in selected.read() {
        let Some(item) = menu.item(*index) else {
            warn!("Radial item {index} does not exist");
            continue;
        };
        debug!("Radial menu: {}", item.info_text);
        match item.action {
            RadialAction::Switch(mode) => {
                requests.write(ModeRequest::Switch(mode));
            }
            RadialAction::TypeInChat => {
                chat.write(EnterChatMode);
            }
        }
    }
}
