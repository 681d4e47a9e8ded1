//! Color palette and styles.
//!
//! Navy and amber, the usual insurer look; red is reserved for "likely to
//! claim" and errors.

use ratatui::style::{Color, Modifier, Style};

use crate::domain::Verdict;

/// Theme color palette.
pub struct ClaimTheme;

impl ClaimTheme {
    pub const AMBER: Color = Color::Rgb(245, 158, 11); // #F59E0B
    pub const AMBER_LIGHT: Color = Color::Rgb(252, 211, 77); // #FCD34D
    pub const NAVY: Color = Color::Rgb(30, 58, 138); // #1E3A8A
    pub const SLATE: Color = Color::Rgb(148, 163, 184); // #94A3B8
    pub const SLATE_DARK: Color = Color::Rgb(100, 116, 139); // #64748B
    pub const SNOW: Color = Color::Rgb(248, 250, 252); // #F8FAFC

    pub const GREEN: Color = Color::Rgb(34, 197, 94); // #22C55E
    pub const YELLOW: Color = Color::Rgb(251, 191, 36); // #FBBF24
    pub const RED: Color = Color::Rgb(239, 68, 68); // #EF4444
    pub const SKY: Color = Color::Rgb(96, 165, 250); // #60A5FA

    /// Probability at or above which the gauge turns yellow.
    pub const GAUGE_CAUTION: f64 = 0.3;

    fn fg(color: Color) -> Style {
        Style::default().fg(color)
    }

    fn bold(color: Color) -> Style {
        Self::fg(color).add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn title() -> Style {
        Self::bold(Self::SNOW)
    }

    #[must_use]
    pub fn subtitle() -> Style {
        Self::bold(Self::AMBER_LIGHT)
    }

    #[must_use]
    pub fn text() -> Style {
        Self::fg(Self::SNOW)
    }

    #[must_use]
    pub fn text_secondary() -> Style {
        Self::fg(Self::SLATE)
    }

    #[must_use]
    pub fn text_muted() -> Style {
        Self::fg(Self::SLATE_DARK)
    }

    #[must_use]
    pub fn success() -> Style {
        Self::fg(Self::GREEN)
    }

    #[must_use]
    pub fn warning() -> Style {
        Self::fg(Self::YELLOW)
    }

    #[must_use]
    pub fn danger() -> Style {
        Self::fg(Self::RED)
    }

    #[must_use]
    pub fn info() -> Style {
        Self::fg(Self::SKY)
    }

    /// Label of the focused form field or input box.
    #[must_use]
    pub fn focused() -> Style {
        Self::bold(Self::AMBER_LIGHT)
    }

    #[must_use]
    pub fn cursor() -> Style {
        Self::fg(Self::AMBER_LIGHT)
    }

    #[must_use]
    pub fn border() -> Style {
        Self::fg(Self::SLATE)
    }

    #[must_use]
    pub fn border_focused() -> Style {
        Self::fg(Self::AMBER)
    }

    /// Header row of the batch preview table.
    #[must_use]
    pub fn table_header() -> Style {
        Self::bold(Self::SNOW).bg(Self::NAVY)
    }

    #[must_use]
    pub fn key_hint() -> Style {
        Self::bold(Self::AMBER_LIGHT)
    }

    #[must_use]
    pub fn key_desc() -> Style {
        Self::fg(Self::SLATE)
    }

    #[must_use]
    pub fn verdict(verdict: Verdict) -> Style {
        match verdict {
            Verdict::LikelyToClaim => Self::danger(),
            Verdict::UnlikelyToClaim => Self::success(),
        }
    }

    /// Gauge color for a claim probability: red from the 0.5 decision
    /// threshold up, yellow from `GAUGE_CAUTION`.
    #[must_use]
    pub fn gauge(probability: f64) -> Style {
        if probability >= 0.5 {
            Self::danger()
        } else if probability >= Self::GAUGE_CAUTION {
            Self::warning()
        } else {
            Self::success()
        }
    }
}
