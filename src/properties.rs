//! Record types produced and persisted by the evidence compiler.
//!
//! The bubble collection (`bubbles.json`) and the ledger (`compiler_log.csv`) are read as opaque
//! snapshots by other processes, so the field names and defaults in this module are a wire
//! contract. [`Bubble`] serializes with camelCase keys.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default text colour for bubble captions.
pub const DEFAULT_TEXT_COLOR: &str = "yellow";
/// Default bubble radius in canvas pixels.
pub const DEFAULT_RADIUS: u32 = 28;
/// Default caption font.
pub const DEFAULT_FONT: &str = "Trebuchet MS";
/// Default caption font size.
pub const DEFAULT_FONT_SIZE: u32 = 8;
/// Default bubble shape.
pub const DEFAULT_SHAPE: &str = "circle";
/// Status written to the ledger for every compiled file.
pub const STATUS_PROCESSED: &str = "processed";

/// Hex-encoded SHA-256 digest of a file's full byte content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentFingerprint(String);

impl ContentFingerprint {
    /// Length of a fingerprint in hex characters.
    pub const HEX_LEN: usize = 64;

    pub fn from_digest(digest: &[u8]) -> Self {
        ContentFingerprint(hex::encode(digest))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<ContentFingerprint> for String {
    fn from(fp: ContentFingerprint) -> String {
        fp.0
    }
}

/// A hyperlink found in evidence text.
///
/// `title` is the authority (`host[:port]`) of `href`, or `href` itself when no authority can be
/// recovered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkReference {
    pub href: String,
    pub title: String,
}

/// Initial placement and colour for a new bubble.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub color: String,
}

/// One visualization record derived from one evidence file.
///
/// Everything apart from the content-derived fields (`title`, `description`, `urls`, `image`,
/// `source`), the layout and the creation stamp is a fixed display default; see
/// [`Bubble::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bubble {
    pub title: String,
    pub description: String,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub color: String,
    pub text_color: String,
    pub radius: u32,
    pub font: String,
    /// Evidence-root relative path of a companion image, or empty.
    pub image: String,
    pub glow: bool,
    pub font_size: u32,
    pub rotation: i32,
    pub fixed: bool,
    #[serde(rename = "static")]
    pub is_static: bool,
    pub shape: String,
    pub height_ratio: u32,
    pub show_pause_border: bool,
    /// Local processing date, `YYYY-MM-DD`.
    pub created_date: String,
    /// Local processing time, `HH:MM:SS`.
    pub created_time: String,
    pub goals: u32,
    pub flash_until: u64,
    pub goal_cooldown: u64,
    pub ball_velocity_boost: f64,
    pub ball_velocity_decay: f64,
    pub attachments: Vec<String>,
    pub urls: Vec<LinkReference>,
    /// Evidence-root relative path of the source document (`/` separated).
    #[serde(default)]
    pub source: String,
}

impl Bubble {
    /// Assemble a bubble from its content-derived parts, filling every display default.
    pub fn new(
        source: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        layout: Layout,
        urls: Vec<LinkReference>,
        image: impl Into<String>,
        created: chrono::NaiveDateTime,
    ) -> Self {
        let Layout {
            x,
            y,
            vx,
            vy,
            color,
        } = layout;
        Bubble {
            title: title.into(),
            description: description.into(),
            x,
            y,
            vx,
            vy,
            color,
            text_color: DEFAULT_TEXT_COLOR.to_string(),
            radius: DEFAULT_RADIUS,
            font: DEFAULT_FONT.to_string(),
            image: image.into(),
            glow: true,
            font_size: DEFAULT_FONT_SIZE,
            rotation: 0,
            fixed: true,
            is_static: true,
            shape: DEFAULT_SHAPE.to_string(),
            height_ratio: 1,
            show_pause_border: false,
            created_date: created.format("%Y-%m-%d").to_string(),
            created_time: created.format("%H:%M:%S").to_string(),
            goals: 0,
            flash_until: 0,
            goal_cooldown: 0,
            ball_velocity_boost: 0.0,
            ball_velocity_decay: 0.0,
            attachments: Vec::new(),
            urls,
            source: source.into(),
        }
    }
}

/// One row of the compile ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    #[serde(rename = "filename")]
    pub relative_path: String,
    #[serde(rename = "hash")]
    pub fingerprint: String,
    /// Local wall-clock time, `YYYY-MM-DD HH:MM:SS`.
    pub timestamp: String,
    pub status: String,
}
