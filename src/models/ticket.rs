use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One raw ticket row as served by the upstream ticket store.
///
/// The upstream is inconsistent about nested keys (`rute` vs `Rute`, `user`
/// vs `User`) and about scalar types (amounts arrive as strings or numbers,
/// the master flag as a bool or 0/1). All of that is normalized here, at the
/// deserialization boundary, so the rest of the service works with a single
/// canonical shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketRecord {
    #[serde(rename = "id_tiket")]
    pub id: i64,
    /// Key shared by tickets booked together in one transaction.
    /// An empty string from upstream counts as "not grouped".
    #[serde(default, deserialize_with = "de_group_id")]
    pub order_group_id: Option<String>,
    #[serde(rename = "nomor_kursi", default, deserialize_with = "de_opt_string")]
    pub seat: Option<String>,
    #[serde(rename = "status_tiket", default)]
    pub status: TicketStatus,
    #[serde(rename = "total_bayar", default, deserialize_with = "de_amount")]
    pub amount: f64,
    /// Order-level total, only ever set on the master row of a group.
    #[serde(default, deserialize_with = "de_opt_amount")]
    pub order_total_amount: Option<f64>,
    #[serde(rename = "is_master_ticket", default, deserialize_with = "de_flag")]
    pub is_master: bool,
    #[serde(rename = "tanggal_pemesanan", default, deserialize_with = "de_datetime")]
    pub booked_at: Option<DateTime<Utc>>,
    #[serde(rename = "batas_pembayaran", default, deserialize_with = "de_datetime")]
    pub payment_deadline: Option<DateTime<Utc>>,
    #[serde(rename = "rute", alias = "Rute", alias = "route", default)]
    pub route: Option<Route>,
    #[serde(rename = "user", alias = "User", default)]
    pub passenger: Option<Passenger>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    Pending,
    Confirmed,
    Cancelled,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Route {
    #[serde(rename = "asal", default, deserialize_with = "de_opt_string")]
    pub origin: Option<String>,
    #[serde(rename = "tujuan", default, deserialize_with = "de_opt_string")]
    pub destination: Option<String>,
    #[serde(rename = "waktu_berangkat", default, deserialize_with = "de_datetime")]
    pub departure_at: Option<DateTime<Utc>>,
    #[serde(rename = "nama_bus", default, deserialize_with = "de_opt_string")]
    pub bus_name: Option<String>,
    #[serde(rename = "bus", alias = "Bus", default)]
    pub bus: Option<BusInfo>,
}

impl Route {
    /// Bus name from the nested sub-record when present, else the flat field.
    pub fn bus_label(&self) -> Option<&str> {
        self.bus
            .as_ref()
            .and_then(|b| b.name.as_deref())
            .or(self.bus_name.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BusInfo {
    #[serde(rename = "nama_bus", default, deserialize_with = "de_opt_string")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Passenger {
    #[serde(default, deserialize_with = "de_opt_string")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub email: Option<String>,
    #[serde(rename = "no_telepon", default, deserialize_with = "de_opt_string")]
    pub phone: Option<String>,
}

/* ---------- lenient wire parsing ---------- */

/// Parses an upstream amount. Strings and numbers are accepted; anything the
/// upstream managed to corrupt parses as zero instead of failing the row.
pub fn amount_from_value(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Parses the timestamp formats the upstream has been observed to emit:
/// RFC 3339, a naive datetime, or a bare date (taken as midnight UTC).
pub fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|n| n.and_utc());
    }
    None
}

fn de_amount<'de, D: Deserializer<'de>>(de: D) -> Result<f64, D::Error> {
    let raw = Option::<Value>::deserialize(de)?;
    Ok(raw.as_ref().map(amount_from_value).unwrap_or(0.0))
}

fn de_opt_amount<'de, D: Deserializer<'de>>(de: D) -> Result<Option<f64>, D::Error> {
    let raw = Option::<Value>::deserialize(de)?;
    Ok(raw.as_ref().and_then(|v| match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }))
}

fn de_datetime<'de, D: Deserializer<'de>>(de: D) -> Result<Option<DateTime<Utc>>, D::Error> {
    let raw = Option::<Value>::deserialize(de)?;
    Ok(raw.as_ref().and_then(Value::as_str).and_then(parse_datetime))
}

fn de_opt_string<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
    let raw = Option::<Value>::deserialize(de)?;
    Ok(raw.as_ref().and_then(|v| match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }))
}

fn de_group_id<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
    de_opt_string(de).map(|id| id.filter(|s| !s.is_empty()))
}

fn de_flag<'de, D: Deserializer<'de>>(de: D) -> Result<bool, D::Error> {
    let raw = Option::<Value>::deserialize(de)?;
    Ok(match raw {
        Some(Value::Bool(b)) => b,
        Some(Value::Number(n)) => n.as_i64().unwrap_or(0) != 0,
        _ => false,
    })
}
