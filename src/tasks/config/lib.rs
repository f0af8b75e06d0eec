#![allow(non_snake_case)]

// Crate where serde_yaml code for the 'tasks' crate is monomorphized.
//
// The functions here also make use of serde_ignored to catch typos in the config.

// NOTE: Please make sure to use the YamlRead trait!
//       DO NOT USE serde_yaml::from_{reader,value,etc.} OUTSIDE THIS CRATE
//       or else unknown keys are silently dropped.

#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate log;

use ::std::io::Read;

/// Provides an alternative to serde_yaml::from_reader that reports unused
/// keys through the log.
pub trait YamlRead: for <'de> ::serde::Deserialize<'de> {
    fn from_reader(mut r: impl Read) -> Result<Self, ::serde_yaml::Error>
    { YamlRead::from_dyn_reader(&mut r) }

    fn from_dyn_reader(r: &mut dyn Read) -> Result<Self, ::serde_yaml::Error> {
        // serde_ignored needs a Deserializer, and serde_yaml::Value is one.
        Self::from_value(value_from_dyn_reader(r)?)
    }

    fn from_value(value: ::serde_yaml::Value) -> Result<Self, ::serde_yaml::Error>;
}

macro_rules! derive_yaml_read {
    ($Type:ty) => {
        impl YamlRead for $Type {
            fn from_value(value: ::serde_yaml::Value) -> Result<$Type, ::serde_yaml::Error> {
                ::serde_ignored::deserialize(
                    value,
                    |path| warn!("Unused config item (possible typo?): {}", path),
                )
            }
        }
    };
}

derive_yaml_read!{::serde_yaml::Value}

fn value_from_dyn_reader(r: &mut dyn Read) -> Result<::serde_yaml::Value, ::serde_yaml::Error>
{ ::serde_yaml::from_reader(r) }

#[derive(Serialize, Deserialize)]
#[derive(Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct Settings {
    /// How matrix products are computed.
    #[serde(default)]
    pub threading: Threading,

    /// Worker count for `threading: pool`.  `None` uses every available core.
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workers: Option<usize>,

    /// Decimal places when printing matrices.
    #[serde(default = "_settings__precision")]
    pub precision: usize,

    /// Seed for random operands.  `None` seeds from the OS.
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}
derive_yaml_read!{Settings}
fn _settings__precision() -> usize { 5 }

#[derive(Serialize, Deserialize)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Threading {
    /// Everything on the calling thread.
    Serial,
    /// Matrix products on a worker pool.
    Pool,
}

// --------------------------------------------------------

impl Default for Threading {
    fn default() -> Self { Threading::Pool }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            threading: Threading::default(),
            workers: None,
            precision: _settings__precision(),
            seed: None,
        }
    }
}
