//! Product family → (pilar, tower) classification used to auto-fill the
//! entry form once a product family is picked.

use serde::Serialize;

pub const PILARS: [&str; 7] = [
    "Fleet Management",
    "IoT Analytic and Security",
    "Network & Infra",
    "IoT Industrial",
    "Advance Communication",
    "Mobile Security & Emerging",
    "UCC and Business Productivity",
];

pub const TOWERS: [&str; 2] = ["EPINI", "ESEM"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub pilar: &'static str,
    pub tower: &'static str,
}

const FLEET: Classification = Classification { pilar: PILARS[0], tower: TOWERS[0] };
const ANALYTIC: Classification = Classification { pilar: PILARS[1], tower: TOWERS[0] };
const NETWORK: Classification = Classification { pilar: PILARS[2], tower: TOWERS[0] };
const INDUSTRIAL: Classification = Classification { pilar: PILARS[3], tower: TOWERS[0] };
const COMMUNICATION: Classification = Classification { pilar: PILARS[4], tower: TOWERS[0] };
const SECURITY: Classification = Classification { pilar: PILARS[5], tower: TOWERS[1] };
const UCC: Classification = Classification { pilar: PILARS[6], tower: TOWERS[1] };

pub const PRODUCT_FAMILIES: &[(&str, Classification)] = &[
    ("Fleet Sense", FLEET),
    ("Fleet Sight", FLEET),
    ("IoT Analytics", ANALYTIC),
    ("Video Intelligent", ANALYTIC),
    ("Sense Analytics", ANALYTIC),
    ("IoT Sphere", ANALYTIC),
    ("Enterprise Data Lake with Low Code Integrated System", ANALYTIC),
    ("Private Network", NETWORK),
    ("Managed Service SDWAN", NETWORK),
    ("Network Priority", NETWORK),
    ("Direct Peering", NETWORK),
    ("Repeater Picotel", NETWORK),
    ("IaaS", NETWORK),
    ("PVR", NETWORK),
    ("Femtocell", NETWORK),
    ("Intank", INDUSTRIAL),
    ("Fuel Management System", INDUSTRIAL),
    ("Smart Lighting", INDUSTRIAL),
    ("Smart Meter", INDUSTRIAL),
    ("Connected Mine", INDUSTRIAL),
    ("Asset Performance Management", INDUSTRIAL),
    ("Smart Dashboard", INDUSTRIAL),
    ("Vessel Monitoring System", INDUSTRIAL),
    ("Tap on Bus", INDUSTRIAL),
    ("IoT Envion", INDUSTRIAL),
    ("IoT Control Center", COMMUNICATION),
    ("Soundbox", COMMUNICATION),
    ("Connected Worker", COMMUNICATION),
    ("LinkCar", COMMUNICATION),
    ("Modem Router Industrial", COMMUNICATION),
    ("EDC", COMMUNICATION),
    ("Mobile Device Management (MDM)", SECURITY),
    ("Mobile Endpoint Protection (MEP)", SECURITY),
    ("Telkomsel Guard", SECURITY),
    ("Kaspersky Standard Protection", SECURITY),
    ("TEMS - Spam Call Protection", SECURITY),
    ("CloudX Hub", UCC),
    ("nGage Robocall API", UCC),
    ("Attendance Apps", UCC),
    ("CloudX Communication", UCC),
    ("Field Force Management", UCC),
    ("Smart Tax", UCC),
    ("Robotic Process Automation (RPA)", UCC),
    ("Custom POS", UCC),
    ("Enterprise Call Solution", UCC),
    ("Office 365", UCC),
    ("Telkomsel Marketing Automation (TMA) / CEP", UCC),
    ("HCM Suites (Modular Apps)", UCC),
    ("Smart Voice Comm (SVC)", UCC),
    ("nGage Number Masking", UCC),
    ("Touch to Talk", UCC),
    ("nGage Omnichannel", UCC),
    ("nGage Video API", UCC),
    ("AVA - AI Virtual Assistant", UCC),
    ("SAVIA", UCC),
];

/// Pilar and tower of a product family (exact name match).
pub fn classify(product_family: &str) -> Option<Classification> {
    PRODUCT_FAMILIES
        .iter()
        .find(|(name, _)| *name == product_family)
        .map(|(_, c)| *c)
}

/// Product families belonging to `pilar`.
pub fn families_in_pilar(pilar: &str) -> Vec<&'static str> {
    PRODUCT_FAMILIES
        .iter()
        .filter(|(_, c)| c.pilar == pilar)
        .map(|(name, _)| *name)
        .collect()
}
