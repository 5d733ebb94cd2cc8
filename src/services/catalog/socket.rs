use regex::Regex;
use std::sync::LazyLock;

static INTEL_LGA1700: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"i\d-1[2-4]\d{3}").unwrap());
static INTEL_LGA1200: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"i\d-1[0-1]\d{3}").unwrap());
static INTEL_LGA1151: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"i\d-[7-9]\d{3}").unwrap());
static RYZEN_AM5: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s[7-9]\d{3}").unwrap());
static RYZEN_AM4: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s[1-5]\d{3}").unwrap());

/// Guesses a CPU socket from its model name
///
/// Catalog feeds often leave the socket column empty for CPUs, which would
/// otherwise make those rows unusable. Only the mainstream Intel Core and
/// AMD Ryzen/Threadripper generations are recognised.
pub fn infer_cpu_socket(name: &str) -> Option<&'static str> {
    let name = name.to_lowercase();

    if INTEL_LGA1700.is_match(&name) {
        return Some("LGA1700");
    }
    if INTEL_LGA1200.is_match(&name) {
        return Some("LGA1200");
    }
    if INTEL_LGA1151.is_match(&name) {
        return Some("LGA1151");
    }

    if name.contains("threadripper") {
        return Some("sTRX4");
    }
    if name.contains("ryzen") {
        if RYZEN_AM5.is_match(&name) {
            return Some("AM5");
        }
        if RYZEN_AM4.is_match(&name) {
            return Some("AM4");
        }
    }

    None
}
