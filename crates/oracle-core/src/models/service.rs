//! Service categories and their display descriptors

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Equipment service a fault code or reset procedure belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Service {
    Generator,
    Solar,
    Ac,
    Ups,
    Motor,
    Borehole,
    Changeover,
    PowerFactor,
}

impl Service {
    /// Every service, in display order
    pub const ALL: [Service; 8] = [
        Service::Generator,
        Service::Solar,
        Service::Ac,
        Service::Ups,
        Service::Motor,
        Service::Borehole,
        Service::Changeover,
        Service::PowerFactor,
    ];

    /// Canonical lowercase name
    pub fn as_name(&self) -> &'static str {
        match self {
            Service::Generator => "generator",
            Service::Solar => "solar",
            Service::Ac => "ac",
            Service::Ups => "ups",
            Service::Motor => "motor",
            Service::Borehole => "borehole",
            Service::Changeover => "changeover",
            Service::PowerFactor => "power-factor",
        }
    }

    /// Display descriptor for this service
    pub fn descriptor(&self) -> &'static ServiceDescriptor {
        // DESCRIPTORS is laid out in the same order as ALL
        &DESCRIPTORS[*self as usize]
    }
}

impl std::fmt::Display for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_name())
    }
}

impl std::str::FromStr for Service {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "generator" | "generators" => Ok(Service::Generator),
            "solar" => Ok(Service::Solar),
            "ac" | "air-conditioning" => Ok(Service::Ac),
            "ups" => Ok(Service::Ups),
            "motor" | "motor-rewinding" => Ok(Service::Motor),
            "borehole" => Ok(Service::Borehole),
            "changeover" => Ok(Service::Changeover),
            "power-factor" => Ok(Service::PowerFactor),
            _ => Err(format!("unknown service: '{}'", s)),
        }
    }
}

impl Serialize for Service {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_name())
    }
}

impl<'de> Deserialize<'de> for Service {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Static description used to render any service's fault list
#[derive(Debug, Clone, Serialize)]
pub struct ServiceDescriptor {
    pub service: Service,
    pub title: &'static str,
    pub summary: &'static str,
}

static DESCRIPTORS: [ServiceDescriptor; 8] = [
    ServiceDescriptor {
        service: Service::Generator,
        title: "Generator Controllers",
        summary: "Alarm and shutdown codes from diesel generator controllers and ECMs",
    },
    ServiceDescriptor {
        service: Service::Solar,
        title: "Solar Inverters",
        summary: "Inverter, MPPT and battery management fault codes",
    },
    ServiceDescriptor {
        service: Service::Ac,
        title: "Air Conditioning",
        summary: "Indoor and outdoor unit error codes for split and ducted systems",
    },
    ServiceDescriptor {
        service: Service::Ups,
        title: "UPS Systems",
        summary: "Rectifier, inverter and battery alarms on online UPS units",
    },
    ServiceDescriptor {
        service: Service::Motor,
        title: "Electric Motors",
        summary: "Drive and protection relay faults on induction motors",
    },
    ServiceDescriptor {
        service: Service::Borehole,
        title: "Borehole Pumps",
        summary: "Submersible pump controller and dry-run protection faults",
    },
    ServiceDescriptor {
        service: Service::Changeover,
        title: "Changeover Switches",
        summary: "ATS transfer, interlock and mains sensing faults",
    },
    ServiceDescriptor {
        service: Service::PowerFactor,
        title: "Power Factor Correction",
        summary: "Capacitor bank and PFC relay alarms",
    },
];

/// All service descriptors, in display order
pub fn service_descriptors() -> &'static [ServiceDescriptor] {
    &DESCRIPTORS
}
