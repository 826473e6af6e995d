/*
Wristwatch - Wrist Watch HUD
*/
use bevy::prelude::*;

use super::markup::parse_markup;

/// Rich Text Display, Children are Rebuilt Whenever the Markup Changes
#[derive(Component, Debug, Clone)]
pub struct RichLabel {
    pub markup: String,
    /// Used Where the Markup Doesn't Say
    pub font_size: f32,
    pub color: Color,
    /// Watch Scale Applied on Top of Every Size
    pub scale: f32,
}

impl RichLabel {
    pub fn new(font_size: f32, color: Color) -> Self {
        Self {
            markup: String::new(),
            font_size,
            color,
            scale: 1.0,
        }
    }

    /// Replaces the Whole Text in One Write
    pub fn set_markup(&mut self, markup: impl Into<String>) {
        self.markup = markup.into();
    }
}

/// Emphasis Kept on a Span for Fonts That Can Draw It
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpanEmphasis {
    pub bold: bool,
    pub underline: bool,
}

/// Segmented Bar Gauge (Ammo, HP, Infection, Oxygen, Magazine)
#[derive(Component, Debug, Clone, PartialEq)]
pub struct DividedBar {
    pub max_value: i32,
    pub current_value: i32,
    /// 0.0 ..= 1.0
    pub fill: f32,
    pub selected: bool,
    pub color: Color,
    pub cells: u32,
    pub gap: u32,
    pub rendering: bool,
}

impl DividedBar {
    pub const NORMAL_COLOR: Color = Color::srgb(0.55, 0.55, 0.55);
    /// Biggest Grid We Bother Drawing, One Cell per Bullet
    pub const MAX_CELLS: u32 = 100;

    pub fn new(color: Color) -> Self {
        Self {
            max_value: 100,
            current_value: 100,
            fill: 1.0,
            selected: false,
            color,
            cells: 1,
            gap: 1,
            rendering: true,
        }
    }

    pub fn set_fill(&mut self, fill: f32) {
        self.fill = fill.clamp(0.0, 1.0);
    }

    /// Numeric Readout, Fill Follows From 'max_value'
    pub fn update_fill(&mut self, value: i32) {
        self.current_value = value;
        let max = self.max_value.max(1) as f32;
        self.set_fill(value as f32 / max);
    }

    pub fn update_current_ammo(&mut self, clip: i32) {
        self.update_fill(clip);
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    pub fn toggle_rendering(&mut self, on: bool) {
        self.rendering = on;
    }

    pub fn update_shader_vals(&mut self, cells: u32, gap: u32) {
        self.cells = cells.max(1);
        self.gap = gap;
    }

    /// One Cell per Magazine
    pub fn update_weapon_mag_divisions(&mut self, clip_size: i32, max_cap: i32) {
        let clip = clip_size.max(1);
        let mags = (max_cap.max(0) + clip - 1) / clip;
        self.update_shader_vals(mags.max(1) as u32, 1);
    }

    /// Packs and Consumables Show Five Uses
    pub fn update_pack_or_consumable_divisions(&mut self) {
        self.update_shader_vals(5, 1);
    }

    /// One Cell per Bullet in the Clip
    pub fn update_ammo_grid_divisions(&mut self) {
        let cells = self.max_value.clamp(1, Self::MAX_CELLS as i32) as u32;
        self.update_shader_vals(cells, 1);
        self.update_fill(self.current_value);
    }

    /// What Actually Gets Drawn
    pub fn display_color(&self) -> Color {
        if self.selected {
            let c = self.color.to_srgba();
            Color::srgba(
                (c.red * 1.5).min(1.0),
                (c.green * 1.5).min(1.0),
                (c.blue * 1.5).min(1.0),
                c.alpha,
            )
        } else {
            self.color
        }
    }
}

/// Inner Fill Node of a 'DividedBar'
#[derive(Component)]
pub struct BarFill;

/// Gap Between Two Cells of a 'DividedBar'
#[derive(Component)]
pub struct BarDivider;

const DIVIDER_COLOR: Color = Color::srgba(0.0, 0.0, 0.0, 0.85);

fn divider_node(index: u32, cells: u32, gap: u32) -> Node {
    Node {
        position_type: PositionType::Absolute,
        left: Val::Percent(index as f32 * 100.0 / cells as f32),
        width: Val::Px(gap as f32),
        height: Val::Percent(100.0),
        ..default()
    }
}

/// Fill, Color, Visibility and Cell Dividers Follow the Bar State
pub fn sync_divided_bars(
    mut commands: Commands,
    mut q_bars: Query<(Entity, &DividedBar, &Children, &mut Visibility), Changed<DividedBar>>,
    mut q_fill: Query<(&mut Node, &mut BackgroundColor), (With<BarFill>, Without<BarDivider>)>,
    q_dividers: Query<&Node, (With<BarDivider>, Without<BarFill>)>,
) {
    for (bar_e, bar, children, mut vis) in &mut q_bars {
        vis.set_if_neq(if bar.rendering {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        });

        let mut dividers = Vec::new();
        for child in children.iter() {
            if let Ok((mut node, mut bg)) = q_fill.get_mut(child) {
                node.width = Val::Percent(bar.fill * 100.0);
                bg.0 = bar.display_color();
            } else if let Ok(node) = q_dividers.get(child) {
                dividers.push((child, node.width));
            }
        }

        let cells = bar.cells.clamp(1, DividedBar::MAX_CELLS);
        let wanted = (cells - 1) as usize;
        let gap = Val::Px(bar.gap as f32);
        if dividers.len() == wanted && dividers.iter().all(|(_, w)| *w == gap) {
            continue;
        }

        for (e, _) in dividers {
            commands.entity(e).despawn();
        }
        for i in 1..cells {
            commands.spawn((
                BarDivider,
                divider_node(i, cells, bar.gap),
                BackgroundColor(DIVIDER_COLOR),
                ChildOf(bar_e),
            ));
        }
    }
}

/// Turns Changed Markup Into Text Spans
pub fn rebuild_rich_labels(
    mut commands: Commands,
    mut q_labels: Query<
        (Entity, &RichLabel, &mut Text, &mut TextFont, &mut TextColor, Option<&Children>),
        Changed<RichLabel>,
    >,
) {
    for (entity, label, mut text, mut font, mut color, children) in &mut q_labels {
        if let Some(children) = children {
            for child in children.iter() {
                commands.entity(child).despawn();
            }
        }

        text.0.clear();
        font.font_size = label.font_size * label.scale;
        color.0 = label.color;

        let spans = parse_markup(&label.markup);
        commands.entity(entity).with_children(|parent| {
            for span in spans {
                parent.spawn((
                    TextSpan::new(span.text),
                    TextFont {
                        font_size: span.style.size.unwrap_or(label.font_size) * label.scale,
                        ..default()
                    },
                    TextColor(span.style.color.unwrap_or(label.color)),
                    SpanEmphasis {
                        bold: span.style.bold,
                        underline: span.style.underline,
                    },
                ));
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_follows_value() {
        let mut bar = DividedBar::new(DividedBar::NORMAL_COLOR);
        bar.max_value = 30;
        bar.update_fill(15);
        assert_eq!(bar.fill, 0.5);
        bar.update_fill(60);
        assert_eq!(bar.fill, 1.0);
    }

    #[test]
    fn magazine_divisions_round_up() {
        let mut bar = DividedBar::new(DividedBar::NORMAL_COLOR);
        bar.update_weapon_mag_divisions(30, 95);
        assert_eq!(bar.cells, 4);
        bar.update_weapon_mag_divisions(0, 0);
        assert_eq!(bar.cells, 1);
    }

    #[test]
    fn ammo_grid_caps_cells() {
        let mut bar = DividedBar::new(DividedBar::NORMAL_COLOR);
        bar.max_value = 500;
        bar.current_value = 250;
        bar.update_ammo_grid_divisions();
        assert_eq!(bar.cells, DividedBar::MAX_CELLS);
        assert_eq!(bar.fill, 0.5);
    }

    #[test]
    fn selection_brightens() {
        let mut bar = DividedBar::new(Color::srgb(0.4, 0.2, 0.8));
        assert_eq!(bar.display_color(), bar.color);
        bar.set_selected(true);
        assert_ne!(bar.display_color(), bar.color);
    }
}
