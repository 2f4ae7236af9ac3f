use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use mockable::Clock;

/// Clock frozen at one local instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(DateTime<Local>);

impl FixedClock {
    pub fn at(local: NaiveDateTime) -> Self {
        let at = Local
            .from_local_datetime(&local)
            .earliest()
            .unwrap_or_else(|| Local.from_utc_datetime(&local));
        Self(at)
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0.with_timezone(&Utc)
    }
}

/// Current wall-clock time without zone, the frame appointments are written in.
pub fn naive_now(clock: &dyn Clock) -> NaiveDateTime {
    clock.local().naive_local()
}
