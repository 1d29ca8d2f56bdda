//! Built-in rate providers.

mod exchangerate;
mod fawazahmed;
mod freecurrency;
mod open_er;

pub use exchangerate::ExchangeRateApiProvider;
pub use fawazahmed::FawazahmedProvider;
pub use freecurrency::FreeCurrencyApiProvider;
pub use open_er::OpenErApiProvider;

pub const EXCHANGERATE: &str = exchangerate::NAME;
pub const FREECURRENCY: &str = freecurrency::NAME;
pub const FAWAZ_CDN: &str = fawazahmed::CDN_NAME;
pub const FAWAZ_MIRROR: &str = fawazahmed::MIRROR_NAME;
pub const OPEN_ER: &str = open_er::NAME;

fn trim_base(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}
