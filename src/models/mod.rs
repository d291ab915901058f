// Domain models: month selector, packet decoding, aggregated output

mod chart;
mod month;
mod packet;

pub use chart::{ChartData, DailyAverages, FieldSeries};
pub use month::{Month, MonthError};
pub use packet::{
    FieldLookup, FieldMatch, RawPacket, TIMESTAMP_KEY, coerce_number, parse_timestamp,
};
