use std::fmt::{self, Display, Formatter};

use chrono::{Local, NaiveDate};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// How the random suffix of a serial number is formatted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SerialStyle {
    /// Two-digit suffix; every serial is `YYMMDDNN`.
    #[default]
    Padded,
    /// Suffix without leading zero, so serials are 7 or 8 digits long.
    Compat,
}

/// Zone serial number: the date as `YYMMDD` followed by a draw in `0..100`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Serial(String);

impl Serial {
    /// Build a serial from a date and a draw. Draws of 100 and above wrap.
    pub fn generate(date: NaiveDate, draw: u8, style: SerialStyle) -> Self {
        let draw = draw % 100;
        let day = date.format("%y%m%d");
        match style {
            SerialStyle::Padded => Self(format!("{day}{draw:02}")),
            SerialStyle::Compat => Self(format!("{day}{draw}")),
        }
    }

    /// Serial for the local date with a random draw.
    pub fn today(style: SerialStyle) -> Self {
        let draw = rand::rng().random_range(0..100u8);
        Self::generate(Local::now().date_naive(), draw, style)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Serial {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
