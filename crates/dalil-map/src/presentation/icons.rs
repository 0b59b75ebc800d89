use std::collections::HashMap;
use std::sync::Arc;

use dalil_core::EntityKind;
use serde::Serialize;

/// Fixed palette for marker kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorToken {
    Teal,
    Blue,
    Purple,
    Orange,
}

impl ColorToken {
    #[must_use]
    pub fn for_kind(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Shop => ColorToken::Teal,
            EntityKind::Service => ColorToken::Blue,
            EntityKind::User => ColorToken::Purple,
            EntityKind::Product => ColorToken::Orange,
        }
    }

    #[must_use]
    pub fn hex(self) -> &'static str {
        match self {
            ColorToken::Teal => "#14b8a6",
            ColorToken::Blue => "#3b82f6",
            ColorToken::Purple => "#a855f7",
            ColorToken::Orange => "#f97316",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IconShape {
    /// Teardrop pin with a glyph, anchored at its tip.
    Pin,
    /// Round dot, anchored at its center.
    Dot,
}

/// A ready-to-render marker icon.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerIcon {
    pub shape: IconShape,
    pub glyph: &'static str,
    pub color: ColorToken,
    pub size: (u32, u32),
    pub anchor: (i32, i32),
    pub popup_anchor: (i32, i32),
    /// Inline markup for surfaces that take HTML icons.
    pub html: String,
}

pub(crate) fn glyph_for(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Shop => "🏪",
        EntityKind::Service => "🔧",
        EntityKind::User => "👤",
        EntityKind::Product => "📦",
    }
}

/// Build the pin icon for `kind` in `color`.
#[must_use]
pub fn marker_icon(kind: EntityKind, color: ColorToken) -> MarkerIcon {
    let glyph = glyph_for(kind);
    let html = format!(
        concat!(
            r#"<div class="dalil-pin dalil-pin--{kind}" style="background-color:{color};"#,
            r#"width:32px;height:32px;border-radius:50% 50% 50% 0;transform:rotate(-45deg);"#,
            r#"border:3px solid white;box-shadow:0 2px 8px rgba(0,0,0,0.3);"#,
            r#"display:flex;align-items:center;justify-content:center">"#,
            r#"<span style="transform:rotate(45deg);font-size:16px;color:white">{glyph}</span>"#,
            r#"</div>"#
        ),
        kind = kind,
        color = color.hex(),
        glyph = glyph,
    );
    MarkerIcon {
        shape: IconShape::Pin,
        glyph,
        color,
        size: (32, 32),
        anchor: (16, 32),
        popup_anchor: (0, -32),
        html,
    }
}

/// The pulsing dot drawn at the viewer's position.
#[must_use]
pub fn user_location_icon() -> MarkerIcon {
    MarkerIcon {
        shape: IconShape::Dot,
        glyph: "",
        color: ColorToken::Blue,
        size: (20, 20),
        anchor: (10, 10),
        popup_anchor: (0, -10),
        html: concat!(
            r#"<div class="dalil-user-dot" style="background-color:#3b82f6;width:20px;"#,
            r#"height:20px;border-radius:50%;border:3px solid white;"#,
            r#"box-shadow:0 0 10px rgba(59,130,246,0.5),0 0 20px rgba(59,130,246,0.3)"></div>"#
        )
        .to_string(),
    }
}

/// Icon memo owned by one visualizer instance.
#[derive(Debug, Default)]
pub struct IconCache {
    icons: HashMap<(EntityKind, ColorToken), Arc<MarkerIcon>>,
    user: Option<Arc<MarkerIcon>>,
}

impl IconCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn icon(&mut self, kind: EntityKind, color: ColorToken) -> Arc<MarkerIcon> {
        Arc::clone(
            self.icons
                .entry((kind, color))
                .or_insert_with(|| Arc::new(marker_icon(kind, color))),
        )
    }

    /// The viewer's own dot, built once.
    pub fn user_location(&mut self) -> Arc<MarkerIcon> {
        Arc::clone(
            self.user
                .get_or_insert_with(|| Arc::new(user_location_icon())),
        )
    }

    /// Same result as [`super::present`], with the icon shared across calls.
    pub fn present(&mut self, kind: EntityKind) -> super::MarkerPresentation {
        let color = ColorToken::for_kind(kind);
        super::MarkerPresentation {
            kind,
            color,
            icon: self.icon(kind, color),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.icons.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }
}
