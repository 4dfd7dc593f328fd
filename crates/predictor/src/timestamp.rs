use time::{
    format_description::{well_known::Rfc3339, BorrowedFormatItem},
    macros::format_description,
    OffsetDateTime, PrimitiveDateTime,
};

/// Dashboard date picker format, e.g. `6/30/2025 14:00`
const DASHBOARD_FORMAT: &[BorrowedFormatItem<'static>] = format_description!(
    "[month padding:none]/[day padding:none]/[year] [hour padding:none]:[minute]"
);

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Invalid timestamp '{0}', expected M/D/YYYY H:MM or RFC 3339")]
    Malformed(String),
}

/// The parts of a timestamp the rule engine looks at
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeFeatures {
    pub hour: u8,
    pub month: u8,
}

impl From<PrimitiveDateTime> for TimeFeatures {
    fn from(dt: PrimitiveDateTime) -> Self {
        Self {
            hour: dt.hour(),
            month: u8::from(dt.month()),
        }
    }
}

pub fn parse_timestamp(raw: &str) -> Result<TimeFeatures, Error> {
    let trimmed = raw.trim();
    if let Ok(dt) = PrimitiveDateTime::parse(trimmed, DASHBOARD_FORMAT) {
        return Ok(dt.into());
    }
    // Local wall-clock hour is what matters, so the offset is dropped rather than converted
    OffsetDateTime::parse(trimmed, &Rfc3339)
        .map(|dt| PrimitiveDateTime::new(dt.date(), dt.time()).into())
        .map_err(|_| Error::Malformed(raw.to_owned()))
}
