use std::sync::LazyLock;

use super::schema::FieldSchema;

/// Sensor fields in payload order.
///
/// Every port packs its enabled fields in exactly this sequence, whatever
/// subset is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldKind {
    Battery,
    Temperature,
    Humidity,
    Pressure,
    Gas,
    Location,
}

impl FieldKind {
    pub const ALL: [FieldKind; 6] = [
        FieldKind::Battery,
        FieldKind::Temperature,
        FieldKind::Humidity,
        FieldKind::Pressure,
        FieldKind::Gas,
        FieldKind::Location,
    ];

    /// Key used in decoded records.
    pub fn name(self) -> &'static str {
        match self {
            FieldKind::Battery => "battery",
            FieldKind::Temperature => "temperature",
            FieldKind::Humidity => "humidity",
            FieldKind::Pressure => "pressure",
            FieldKind::Gas => "gas",
            FieldKind::Location => "location",
        }
    }

    pub fn schema(self) -> &'static FieldSchema {
        &SCHEMAS[self as usize]
    }
}

// Mirrors the device firmware; indexed by `FieldKind`.
static SCHEMAS: LazyLock<[FieldSchema; 6]> = LazyLock::new(|| {
    [
        FieldSchema::new(2, 1, 1.0, false, None),
        FieldSchema::new(2, 1, 100.0, true, None),
        FieldSchema::new(1, 1, 2.55, false, Some(2)),
        FieldSchema::new(4, 1, 1.0, false, None),
        FieldSchema::new(4, 1, 1.0, false, None),
        FieldSchema::new(8, 2, 10_000.0, true, None),
    ]
});

/// Field presence flags for one port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortLayout {
    pub port: u32,
    pub battery: bool,
    pub temperature: bool,
    pub humidity: bool,
    pub pressure: bool,
    pub gas: bool,
    pub location: bool,
}

impl PortLayout {
    pub fn contains(&self, field: FieldKind) -> bool {
        match field {
            FieldKind::Battery => self.battery,
            FieldKind::Temperature => self.temperature,
            FieldKind::Humidity => self.humidity,
            FieldKind::Pressure => self.pressure,
            FieldKind::Gas => self.gas,
            FieldKind::Location => self.location,
        }
    }

    /// Enabled fields in payload order.
    pub fn fields(&self) -> impl Iterator<Item = FieldKind> + '_ {
        FieldKind::ALL
            .into_iter()
            .filter(|field| self.contains(*field))
    }

    /// Number of bytes a payload for this port occupies.
    pub fn payload_len(&self) -> usize {
        self.fields().map(|field| field.schema().total_bytes()).sum()
    }
}

const fn port(
    port: u32,
    battery: bool,
    temperature: bool,
    humidity: bool,
    pressure: bool,
    gas: bool,
    location: bool,
) -> PortLayout {
    PortLayout {
        port,
        battery,
        temperature,
        humidity,
        pressure,
        gas,
        location,
    }
}

const Y: bool = true;
const N: bool = false;

/// Every defined port, in ascending order.
#[rustfmt::skip]
pub const PORTS: &[PortLayout] = &[
    //    port  batt temp hum press gas  loc
    port(1,  Y, N, N, N, N, N),
    port(2,  N, Y, N, N, N, N),
    port(3,  Y, Y, N, N, N, N),
    port(4,  N, Y, Y, N, N, N),
    port(5,  Y, Y, Y, N, N, N),
    port(6,  N, Y, Y, Y, N, N),
    port(7,  Y, Y, Y, Y, N, N),
    port(8,  N, Y, Y, Y, Y, N),
    port(9,  Y, Y, Y, Y, Y, N),
    port(50, N, N, N, N, N, Y),
    port(51, Y, N, N, N, N, Y),
    port(52, N, Y, N, N, N, Y),
    port(53, Y, Y, N, N, N, Y),
    port(54, N, Y, Y, N, N, Y),
    port(55, Y, Y, Y, N, N, Y),
    port(56, N, Y, Y, Y, N, Y),
    port(57, Y, Y, Y, Y, N, Y),
    port(58, N, Y, Y, Y, Y, Y),
    port(59, Y, Y, Y, Y, Y, Y),
];

/// Resolve a port identifier to its layout. There is no default layout.
pub fn layout_for(port: u32) -> Option<&'static PortLayout> {
    PORTS.iter().find(|layout| layout.port == port)
}
