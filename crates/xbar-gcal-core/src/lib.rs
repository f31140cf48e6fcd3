//! Core types: raw events, normalization, link extraction, menu rendering

pub mod app;
pub mod error;
pub mod event;
pub mod format;
pub mod links;
pub mod normalize;
pub mod raw_event;
pub mod time;
pub mod tracing;

pub use app::{APP, AppInfo};
pub use error::{CoreError, CoreResult};
pub use event::{Bucket, Classification, LabelFormat, NormalizedEvent, SortKey, classify};
pub use format::{MenuRenderer, NO_EVENTS_MESSAGE, REFRESH_LINE, SEPARATOR, render, write_lines};
pub use links::{DescriptionExtractor, EntryPointExtractor, LinkResolver, UrlExtractor};
pub use normalize::{Normalizer, normalize, normalize_at};
pub use raw_event::{RawAttendee, RawConferenceData, RawEntryPoint, RawEvent, RawEventTime};
pub use time::{EventStart, TimeWindow};
pub use self::tracing::{HostApplet, TracingConfig, TracingError, init_tracing};
