// NetSim: Network Topology Simulator written in Rust
// Copyright (C) 2022-2023 Tibor Schneider <sctibor@ethz.ch>
//
// This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation; either version 2 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along
// with this program; if not, write to the Free Software Foundation, Inc.,
// 51 Franklin Street, Fifth Floor, Boston, MA 02110-1301 USA.

//! Open, string-keyed configuration properties and the data-driven rules that validate them.
//!
//! Every element carries a [`PropertyMap`] whose keys and defaults are determined by its
//! [`ElementKind`](crate::element::ElementKind). Values are a closed tagged union
//! ([`PropertyValue`]) instead of `Any`-style dynamic typing, and the per-kind validation rules
//! are expressed as [`PropertyRule`] tables rather than virtual methods.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::ConfigError;

/// An ordered, string-keyed property map.
pub type PropertyMap = BTreeMap<String, PropertyValue>;

/// A single configuration value. Serializes untagged, so the JSON form is the natural scalar
/// (or list of strings).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// A boolean flag.
    Bool(bool),
    /// An integer quantity (port counts, core counts, percentages, ...).
    Int(i64),
    /// A floating-point quantity.
    Float(f64),
    /// A free-form string.
    Str(String),
    /// A list of strings (e.g. the services exposed by a server).
    StrList(Vec<String>),
}

impl PropertyValue {
    /// Return the contained string, if this is a [`PropertyValue::Str`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Return the contained boolean, if this is a [`PropertyValue::Bool`].
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Return the contained integer, if this is a [`PropertyValue::Int`].
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(x) => Some(*x),
            _ => None,
        }
    }

    /// Return the value as a float, accepting both [`PropertyValue::Int`] and
    /// [`PropertyValue::Float`].
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Int(x) => Some(*x as f64),
            Self::Float(x) => Some(*x),
            _ => None,
        }
    }

    /// Return the contained list, if this is a [`PropertyValue::StrList`].
    pub fn as_str_list(&self) -> Option<&[String]> {
        match self {
            Self::StrList(l) => Some(l),
            _ => None,
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for PropertyValue {
    fn from(x: i64) -> Self {
        Self::Int(x)
    }
}

impl From<f64> for PropertyValue {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<Vec<String>> for PropertyValue {
    fn from(l: Vec<String>) -> Self {
        Self::StrList(l)
    }
}

/// A single validation rule over a [`PropertyMap`]. The rule tables for each element kind are
/// static data, see [`ElementKind::rules`](crate::element::ElementKind::rules).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyRule {
    /// The key must hold a well-formed dotted-quad IPv4 string.
    Ipv4(&'static str),
    /// The key must either be empty or hold a well-formed dotted-quad IPv4 string.
    Ipv4OrEmpty(&'static str),
    /// Like [`PropertyRule::Ipv4`], but only checked when the boolean flag property is set.
    Ipv4If(&'static str, &'static str),
    /// The key must hold a non-empty string.
    NonEmpty(&'static str),
    /// Like [`PropertyRule::NonEmpty`], but only checked when the boolean flag property is set.
    NonEmptyIf(&'static str, &'static str),
    /// The key must hold a strictly positive integer.
    PositiveInt(&'static str),
    /// Like [`PropertyRule::PositiveInt`], but only checked when the boolean flag property is
    /// set.
    PositiveIntIf(&'static str, &'static str),
    /// The key must hold a strictly positive number (integer or float).
    PositiveNumber(&'static str),
    /// The key must hold a list with at least one entry.
    NonEmptyList(&'static str),
    /// The password key must be non-empty whenever the security-type key is not `"Open"`, and
    /// between 8 and 63 characters for `"WPA2"`.
    WirelessPassword {
        /// Key holding the password string.
        password: &'static str,
        /// Key holding the security type string.
        security: &'static str,
    },
}

impl PropertyRule {
    /// Check this rule against a property map.
    pub fn check(&self, map: &PropertyMap) -> Result<(), ConfigError> {
        match *self {
            Self::Ipv4(key) => check_ipv4(map, key),
            Self::Ipv4OrEmpty(key) => match map.get(key).and_then(PropertyValue::as_str) {
                None => Ok(()),
                Some("") => Ok(()),
                Some(s) if is_dotted_quad(s) => Ok(()),
                Some(_) => Err(ConfigError::InvalidIpAddress(key)),
            },
            Self::Ipv4If(key, flag) => {
                if flag_set(map, flag) {
                    check_ipv4(map, key)
                } else {
                    Ok(())
                }
            }
            Self::NonEmpty(key) => check_non_empty(map, key),
            Self::NonEmptyIf(key, flag) => {
                if flag_set(map, flag) {
                    check_non_empty(map, key)
                } else {
                    Ok(())
                }
            }
            Self::PositiveInt(key) => check_positive_int(map, key),
            Self::PositiveIntIf(key, flag) => {
                if flag_set(map, flag) {
                    check_positive_int(map, key)
                } else {
                    Ok(())
                }
            }
            Self::PositiveNumber(key) => {
                let value = map.get(key).ok_or(ConfigError::MissingProperty(key))?;
                match value.as_number() {
                    Some(x) if x > 0.0 => Ok(()),
                    Some(_) => Err(ConfigError::NotPositive(key)),
                    None => Err(ConfigError::WrongKind(key)),
                }
            }
            Self::NonEmptyList(key) => {
                let value = map.get(key).ok_or(ConfigError::MissingProperty(key))?;
                match value.as_str_list() {
                    Some([]) => Err(ConfigError::EmptyList(key)),
                    Some(_) => Ok(()),
                    None => Err(ConfigError::WrongKind(key)),
                }
            }
            Self::WirelessPassword { password, security } => {
                match map.get(security).and_then(PropertyValue::as_str) {
                    None | Some("Open") => Ok(()),
                    Some(kind) => {
                        let pw = map
                            .get(password)
                            .ok_or(ConfigError::MissingProperty(password))?
                            .as_str()
                            .ok_or(ConfigError::WrongKind(password))?;
                        if pw.is_empty() {
                            Err(ConfigError::EmptyProperty(password))
                        } else if kind == "WPA2" && !(8..=63).contains(&pw.len()) {
                            Err(ConfigError::PasswordLength(password, 8, 63))
                        } else {
                            Ok(())
                        }
                    }
                }
            }
        }
    }
}

/// Check that a string is a dotted-quad IPv4 address: exactly four `.`-separated decimal octets
/// in `0..=255`.
pub fn is_dotted_quad(s: &str) -> bool {
    let octets: Vec<&str> = s.split('.').collect();
    octets.len() == 4 && octets.iter().all(|o| o.parse::<u16>().map_or(false, |v| v <= 255))
}

fn flag_set(map: &PropertyMap, flag: &'static str) -> bool {
    map.get(flag).and_then(PropertyValue::as_bool).unwrap_or(false)
}

fn check_ipv4(map: &PropertyMap, key: &'static str) -> Result<(), ConfigError> {
    let value = map.get(key).ok_or(ConfigError::MissingProperty(key))?;
    let s = value.as_str().ok_or(ConfigError::WrongKind(key))?;
    if is_dotted_quad(s) {
        Ok(())
    } else {
        Err(ConfigError::InvalidIpAddress(key))
    }
}

fn check_non_empty(map: &PropertyMap, key: &'static str) -> Result<(), ConfigError> {
    let value = map.get(key).ok_or(ConfigError::MissingProperty(key))?;
    let s = value.as_str().ok_or(ConfigError::WrongKind(key))?;
    if s.is_empty() {
        Err(ConfigError::EmptyProperty(key))
    } else {
        Ok(())
    }
}

fn check_positive_int(map: &PropertyMap, key: &'static str) -> Result<(), ConfigError> {
    let value = map.get(key).ok_or(ConfigError::MissingProperty(key))?;
    match value.as_int() {
        Some(x) if x > 0 => Ok(()),
        Some(_) => Err(ConfigError::NotPositive(key)),
        None => Err(ConfigError::WrongKind(key)),
    }
}
