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

//! Network elements (device nodes) and the closed set of device kinds.
//!
//! There is a single [`Element`] struct. All kind-specific behavior (default name, default
//! property map, maximum connection count, validation rules) is dispatched through
//! [`ElementKind`] tables instead of a type hierarchy.

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::properties::{PropertyMap, PropertyRule, PropertyValue};
use crate::types::{ConfigError, ElementId};

/// The closed set of device categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    /// A device without any kind-specific behavior.
    Generic,
    /// A router.
    Router,
    /// A network switch.
    Switch,
    /// A server machine.
    Server,
    /// A desktop computer.
    Computer,
    /// A modem terminating the uplink.
    Modem,
    /// A dedicated firewall appliance.
    Firewall,
    /// A wireless access point.
    AccessPoint,
    /// A network printer.
    Printer,
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Generic => "Generic",
            Self::Router => "Router",
            Self::Switch => "Switch",
            Self::Server => "Server",
            Self::Computer => "Computer",
            Self::Modem => "Modem",
            Self::Firewall => "Firewall",
            Self::AccessPoint => "AccessPoint",
            Self::Printer => "Printer",
        })
    }
}

static ROUTER_RULES: &[PropertyRule] = &[
    PropertyRule::Ipv4("IP Address"),
    PropertyRule::Ipv4("Subnet Mask"),
    PropertyRule::Ipv4OrEmpty("Default Gateway"),
    PropertyRule::Ipv4("DNS Server"),
    PropertyRule::NonEmptyIf("Wireless SSID", "Wireless"),
];

static SWITCH_RULES: &[PropertyRule] = &[
    PropertyRule::Ipv4If("IP Address", "Managed"),
    PropertyRule::Ipv4If("Subnet Mask", "Managed"),
    PropertyRule::Ipv4If("Default Gateway", "Managed"),
    PropertyRule::PositiveInt("Port Count"),
    PropertyRule::PositiveIntIf("VLAN Count", "VLAN Support"),
];

static SERVER_RULES: &[PropertyRule] = &[
    PropertyRule::Ipv4("IP Address"),
    PropertyRule::Ipv4("Subnet Mask"),
    PropertyRule::Ipv4("Default Gateway"),
    PropertyRule::Ipv4("DNS Server"),
    PropertyRule::PositiveInt("CPU Cores"),
    PropertyRule::PositiveInt("Memory"),
    PropertyRule::PositiveInt("Storage"),
    PropertyRule::NonEmptyList("Services"),
];

static COMPUTER_RULES: &[PropertyRule] = &[
    PropertyRule::Ipv4("IP Address"),
    PropertyRule::Ipv4("Subnet Mask"),
    PropertyRule::Ipv4OrEmpty("Default Gateway"),
    PropertyRule::Ipv4("DNS Server"),
    PropertyRule::NonEmpty("Hostname"),
    PropertyRule::NonEmpty("Operating System"),
];

static MODEM_RULES: &[PropertyRule] = &[
    PropertyRule::Ipv4("IP Address"),
    PropertyRule::Ipv4("Subnet Mask"),
    PropertyRule::PositiveNumber("Download Speed"),
    PropertyRule::PositiveNumber("Upload Speed"),
    PropertyRule::Ipv4If("DNS Server", "DHCP Enabled"),
];

static FIREWALL_RULES: &[PropertyRule] = &[
    PropertyRule::Ipv4("IP Address"),
    PropertyRule::Ipv4("Subnet Mask"),
    PropertyRule::Ipv4OrEmpty("Default Gateway"),
    PropertyRule::Ipv4("DNS Server"),
];

static ACCESS_POINT_RULES: &[PropertyRule] = &[
    PropertyRule::Ipv4("IP Address"),
    PropertyRule::Ipv4("Subnet Mask"),
    PropertyRule::Ipv4OrEmpty("Default Gateway"),
    PropertyRule::Ipv4("DNS Server"),
    PropertyRule::NonEmpty("SSID"),
    PropertyRule::WirelessPassword {
        password: "Password",
        security: "Security Type",
    },
];

static PRINTER_RULES: &[PropertyRule] = &[
    PropertyRule::Ipv4("IP Address"),
    PropertyRule::Ipv4("Subnet Mask"),
    PropertyRule::Ipv4OrEmpty("Default Gateway"),
    PropertyRule::NonEmpty("Model"),
];

fn build_map(entries: &[(&str, PropertyValue)]) -> PropertyMap {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

lazy_static! {
    static ref ROUTER_DEFAULTS: PropertyMap = build_map(&[
        ("IP Address", "192.168.1.1".into()),
        ("Subnet Mask", "255.255.255.0".into()),
        ("Default Gateway", "".into()),
        ("DHCP Enabled", true.into()),
        ("DNS Server", "8.8.8.8".into()),
        ("Brand", "Generic".into()),
        ("Model", "NS-R1000".into()),
        ("Wireless", true.into()),
        ("Wireless SSID", "NetSim_Network".into()),
        ("Wireless Security", "WPA2".into()),
        ("Wireless Password", "password123".into()),
        ("Firewall Enabled", true.into()),
        ("NAT Enabled", true.into()),
        ("QoS Enabled", false.into()),
        ("Bandwidth", 1000i64.into()),
    ]);
    static ref SWITCH_DEFAULTS: PropertyMap = build_map(&[
        ("IP Address", "192.168.1.2".into()),
        ("Subnet Mask", "255.255.255.0".into()),
        ("Default Gateway", "192.168.1.1".into()),
        ("Management VLAN", 1i64.into()),
        ("Brand", "Generic".into()),
        ("Model", "NS-S2400".into()),
        ("Port Count", 24i64.into()),
        ("VLAN Support", true.into()),
        ("VLAN Count", 10i64.into()),
        ("PoE Support", false.into()),
        ("Managed", true.into()),
        ("Layer", 2i64.into()),
        ("Bandwidth", 1000i64.into()),
        ("Backplane Capacity", 48i64.into()),
    ]);
    static ref SERVER_DEFAULTS: PropertyMap = build_map(&[
        ("IP Address", "192.168.1.10".into()),
        ("Subnet Mask", "255.255.255.0".into()),
        ("Default Gateway", "192.168.1.1".into()),
        ("DNS Server", "8.8.8.8".into()),
        ("Brand", "Generic".into()),
        ("Model", "NS-S5000".into()),
        ("Operating System", "NetSim Server OS".into()),
        ("OS Version", "1.0".into()),
        ("CPU", "Generic CPU".into()),
        ("CPU Cores", 8i64.into()),
        ("Memory", 64i64.into()),
        ("Storage", 2000i64.into()),
        ("Server Type", "Web Server".into()),
        (
            "Services",
            vec!["HTTP".to_string(), "HTTPS".to_string(), "FTP".to_string()].into()
        ),
        ("RAID Level", 5i64.into()),
        ("Redundant Power", true.into()),
        ("Virtualization", false.into()),
    ]);
    static ref COMPUTER_DEFAULTS: PropertyMap = build_map(&[
        ("IP Address", "192.168.1.10".into()),
        ("Subnet Mask", "255.255.255.0".into()),
        ("Default Gateway", "192.168.1.1".into()),
        ("DNS Server", "8.8.8.8".into()),
        ("Hostname", "DESKTOP-NS".into()),
        ("Operating System", "Windows 10".into()),
        ("CPU", "Intel Core i5".into()),
        ("RAM", "16 GB".into()),
        ("Storage", "512 GB SSD".into()),
        ("MAC Address", "00:11:22:33:44:55".into()),
        ("DHCP Enabled", true.into()),
        ("Wireless", true.into()),
        ("Firewall Enabled", true.into()),
        ("Antivirus", "Generic Antivirus".into()),
        ("Domain", "".into()),
    ]);
    static ref MODEM_DEFAULTS: PropertyMap = build_map(&[
        ("IP Address", "192.168.0.1".into()),
        ("Subnet Mask", "255.255.255.0".into()),
        ("WAN IP", "0.0.0.0".into()),
        ("Brand", "Generic".into()),
        ("Model", "NS-M2000".into()),
        ("Connection Type", "Cable".into()),
        ("Download Speed", 100i64.into()),
        ("Upload Speed", 20i64.into()),
        ("Router Mode", true.into()),
        ("DHCP Enabled", true.into()),
        ("DNS Server", "8.8.8.8".into()),
        ("MAC Address", "00:11:22:33:44:66".into()),
        ("Firewall Enabled", true.into()),
    ]);
    static ref FIREWALL_DEFAULTS: PropertyMap = build_map(&[
        ("IP Address", "192.168.1.254".into()),
        ("Subnet Mask", "255.255.255.0".into()),
        ("Default Gateway", "192.168.1.1".into()),
        ("DNS Server", "8.8.8.8".into()),
        ("Brand", "Generic".into()),
        ("Model", "NS-FW1000".into()),
        ("Throughput", 1000i64.into()),
        ("Stateful", true.into()),
        ("IPS Enabled", true.into()),
        ("IDS Enabled", true.into()),
        ("VPN Support", true.into()),
        ("NAT Enabled", true.into()),
        ("Log Level", "Info".into()),
        ("Rule Processing", "First Match".into()),
        ("Policy", "Default Deny".into()),
    ]);
    static ref ACCESS_POINT_DEFAULTS: PropertyMap = build_map(&[
        ("IP Address", "192.168.1.5".into()),
        ("Subnet Mask", "255.255.255.0".into()),
        ("Default Gateway", "192.168.1.1".into()),
        ("DNS Server", "8.8.8.8".into()),
        ("Brand", "Generic".into()),
        ("Model", "NS-AP1000".into()),
        ("Enabled", true.into()),
        ("SSID", "NetSim_Network".into()),
        ("Security Type", "WPA2".into()),
        ("Password", "password123".into()),
        ("Channel", 6i64.into()),
        ("Band", "2.4 GHz".into()),
        ("Hidden", false.into()),
        ("Bandwidth", 300i64.into()),
        ("Range", 30i64.into()),
    ]);
    static ref PRINTER_DEFAULTS: PropertyMap = build_map(&[
        ("IP Address", "192.168.1.8".into()),
        ("Subnet Mask", "255.255.255.0".into()),
        ("Default Gateway", "192.168.1.1".into()),
        ("DNS Server", "8.8.8.8".into()),
        ("Brand", "Generic".into()),
        ("Model", "NS-P1000".into()),
        ("Type", "Laser".into()),
        ("Color", true.into()),
        ("DuplexPrinting", true.into()),
        ("PaperSize", "A4".into()),
        ("Resolution", "600 dpi".into()),
        ("Status", "Ready".into()),
        ("TonerLevel", 80i64.into()),
        ("SharedOnNetwork", true.into()),
        ("Location", "Office".into()),
    ]);
    static ref GENERIC_DEFAULTS: PropertyMap = PropertyMap::new();
}

impl ElementKind {
    /// The default display name for newly created elements of this kind.
    pub fn default_name(&self) -> &'static str {
        match self {
            Self::Generic => "Element",
            Self::Router => "Router",
            Self::Switch => "Switch",
            Self::Server => "Server",
            Self::Computer => "Computer",
            Self::Modem => "Modem",
            Self::Firewall => "Firewall",
            Self::AccessPoint => "Access Point",
            Self::Printer => "Printer",
        }
    }

    /// The maximum number of connections an element of this kind may carry, or `None` if the
    /// kind is unbounded.
    pub fn max_connections(&self) -> Option<usize> {
        match self {
            Self::Generic => None,
            Self::Router => Some(8),
            Self::Switch => Some(24),
            Self::Server => Some(4),
            Self::Computer => Some(4),
            Self::Modem => Some(4),
            Self::Firewall => Some(10),
            Self::AccessPoint => Some(16),
            Self::Printer => Some(2),
        }
    }

    /// The default property map for this kind. The returned map always contains every key that
    /// the kind's validation rules refer to.
    pub fn default_properties(&self) -> PropertyMap {
        match self {
            Self::Generic => GENERIC_DEFAULTS.clone(),
            Self::Router => ROUTER_DEFAULTS.clone(),
            Self::Switch => SWITCH_DEFAULTS.clone(),
            Self::Server => SERVER_DEFAULTS.clone(),
            Self::Computer => COMPUTER_DEFAULTS.clone(),
            Self::Modem => MODEM_DEFAULTS.clone(),
            Self::Firewall => FIREWALL_DEFAULTS.clone(),
            Self::AccessPoint => ACCESS_POINT_DEFAULTS.clone(),
            Self::Printer => PRINTER_DEFAULTS.clone(),
        }
    }

    /// The validation rules for this kind, checked in order by
    /// [`Element::validate_config`].
    pub fn rules(&self) -> &'static [PropertyRule] {
        match self {
            Self::Generic => &[],
            Self::Router => ROUTER_RULES,
            Self::Switch => SWITCH_RULES,
            Self::Server => SERVER_RULES,
            Self::Computer => COMPUTER_RULES,
            Self::Modem => MODEM_RULES,
            Self::Firewall => FIREWALL_RULES,
            Self::AccessPoint => ACCESS_POINT_RULES,
            Self::Printer => PRINTER_RULES,
        }
    }
}

/// A 2D canvas position. Layout-only, never consulted by the simulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

/// A device node in the network topology.
///
/// The id is assigned by the owning [`Topology`](crate::topology::Topology) and stays stable for
/// the lifetime of the element. Cloning an element is a deep copy, including list-valued
/// properties.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    id: ElementId,
    kind: ElementKind,
    /// Display name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Canvas position (layout only).
    pub position: Position,
    /// Whether the element is enabled in the editor.
    pub enabled: bool,
    /// The open, kind-specific configuration map.
    pub properties: PropertyMap,
}

impl Element {
    pub(crate) fn new(kind: ElementKind, id: ElementId, name: String) -> Self {
        Self {
            id,
            kind,
            name,
            description: String::new(),
            position: Position::default(),
            enabled: true,
            properties: kind.default_properties(),
        }
    }

    /// The stable, unique id of this element.
    pub fn id(&self) -> ElementId {
        self.id
    }

    /// The kind of this element.
    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub(crate) fn set_id(&mut self, id: ElementId) {
        self.id = id;
    }

    /// Check this element's property map against the rules of its kind, stopping at the first
    /// failing rule.
    pub fn validate_config(&self) -> Result<(), ConfigError> {
        for rule in self.kind.rules() {
            rule.check(&self.properties)?;
        }
        Ok(())
    }
}

impl std::fmt::Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.kind, self.name)
    }
}
