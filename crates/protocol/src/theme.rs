use serde::{Deserialize, Serialize};

/// Semantic color tokens resolved by the renderer's active theme.
///
/// `Ink` and `Paper` are the code's own colors. Renderers must keep them
/// black on white in every theme so printed labels stay scannable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeToken {
    Ink,
    Paper,

    CardBackground,
    CardBorder,

    TextPrimary,
    TextSecondary,
    TextMuted,
    TextError,

    Background,
}
