//! Typed configuration model for the panel.
//!
//! The typed shape a serialized form decodes into. Every field carries a
//! serde default: the serializer drops empty fields entirely, so the defaults
//! here are what covers them.

use crate::form::SerializedForm;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Plot types the display can render.
///
/// Hollow plot types are excluded: white on white doesn't show.
pub const PLOT_TYPES: [&str; 3] = ["candlestick", "line", "ohlc"];

/// Symbol types a ticker can track.
pub const SYMBOL_TYPES: [&str; 2] = ["stock", "crypto"];

/// Panel configuration: the ticker list plus the global settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PanelConfig {
    /// Configured tickers, in display order.
    #[serde(default = "default_tickers")]
    pub tickers: Vec<TickerConfig>,

    /// Sequencing behavior across tickers.
    #[serde(default)]
    pub sequence: SequenceConfig,

    /// API key for the market data provider.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Rotate the display by 180 degrees.
    #[serde(default)]
    pub flip: bool,

    /// Display panel model identifier.
    #[serde(default = "default_epd_model")]
    pub epd_model: String,
}

/// Configuration of a single ticker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TickerConfig {
    /// Kind of symbol, one of [`SYMBOL_TYPES`].
    #[serde(default = "default_symbol_type")]
    pub symbol_type: String,

    /// Symbol to track (e.g. "SPY", "BTC-USD").
    #[serde(default = "default_symbol")]
    pub symbol: String,

    /// Candle interval (e.g. "1d", "5m").
    #[serde(default = "default_interval")]
    pub interval: String,

    /// Number of intervals to plot; the interval's natural lookback when
    /// unset.
    #[serde(default)]
    pub lookback: Option<u32>,

    /// Seconds to display this ticker before moving on.
    #[serde(default)]
    pub wait_time: Option<u32>,

    /// Plot type, one of [`PLOT_TYPES`].
    #[serde(default = "default_plot_type")]
    pub plot_type: String,

    /// Moving average window, in intervals.
    #[serde(default)]
    pub mav: Option<u32>,

    /// Show the traded volume subplot.
    #[serde(default)]
    pub volume: bool,

    /// Average buy price, shown as a relative delta.
    #[serde(default)]
    pub avg_buy_price: Option<f64>,

    /// Include pre/post-market data. Stock symbols only.
    #[serde(default)]
    pub prepost: bool,

    /// Layout of this ticker's display.
    #[serde(default)]
    pub layout: LayoutConfig,
}

/// Display layout of one ticker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LayoutConfig {
    /// Registered layout name.
    #[serde(default = "default_layout_name")]
    pub name: String,

    /// Draw the price axis.
    #[serde(default)]
    pub y_axis: bool,

    /// Leave gaps for missing candles (market closures).
    #[serde(default = "default_x_gaps")]
    pub x_gaps: bool,

    /// Draw the symbol's logo instead of its name.
    #[serde(default)]
    pub show_logo: bool,
}

/// Sequencing behavior across the ticker list.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SequenceConfig {
    /// Skip a ticker whose last candle is too old, e.g. after market close.
    #[serde(default = "default_skip")]
    pub skip_outdated: bool,

    /// Skip a ticker whose response contains no data.
    #[serde(default = "default_skip")]
    pub skip_empty: bool,
}

fn default_tickers() -> Vec<TickerConfig> {
    vec![TickerConfig::default()]
}

fn default_epd_model() -> String {
    "EPD_v3".to_string()
}

fn default_symbol_type() -> String {
    "stock".to_string()
}

fn default_symbol() -> String {
    "SPY".to_string()
}

fn default_interval() -> String {
    "1d".to_string()
}

fn default_plot_type() -> String {
    "candlestick".to_string()
}

fn default_layout_name() -> String {
    "default".to_string()
}

const fn default_x_gaps() -> bool {
    true
}

const fn default_skip() -> bool {
    true
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            tickers: default_tickers(),
            sequence: SequenceConfig::default(),
            api_key: None,
            flip: false,
            epd_model: default_epd_model(),
        }
    }
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            symbol_type: default_symbol_type(),
            symbol: default_symbol(),
            interval: default_interval(),
            lookback: None,
            wait_time: None,
            plot_type: default_plot_type(),
            mav: None,
            volume: false,
            avg_buy_price: None,
            prepost: false,
            layout: LayoutConfig::default(),
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            name: default_layout_name(),
            y_axis: false,
            x_gaps: default_x_gaps(),
            show_logo: false,
        }
    }
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            skip_outdated: default_skip(),
            skip_empty: default_skip(),
        }
    }
}

impl PanelConfig {
    /// Decode a serialized form into the typed model.
    ///
    /// Fields the serializer dropped as empty take their defaults; unknown
    /// fields are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if a present field does not match its typed shape.
    pub fn from_form(form: &SerializedForm) -> Result<Self> {
        let value = serde_json::to_value(form).context("Failed to encode serialized form")?;
        serde_json::from_value(value).context("Failed to decode panel configuration from form")
    }

    /// Decode from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into the model.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse panel configuration")
    }

    /// Encode as a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON encoding fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).context("Failed to encode panel configuration")
    }
}
