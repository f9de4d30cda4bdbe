/// Taille en octets lisible (`B`, `KB`, `MB`, `GB`, base 1024).
pub trait HumanBytes {
    fn human_bytes(&self) -> String;
}

const UNITS: [&str; 3] = ["KB", "MB", "GB"];

fn format_bytes(size: f64) -> String {
    let mut scaled = size;
    let mut unit = None;
    for name in UNITS {
        if scaled.abs() < 1024.0 {
            break;
        }
        scaled /= 1024.0;
        unit = Some(name);
    }
    match unit {
        Some(name) => format!("{:.2} {}", scaled, name),
        None => format!("{} B", size),
    }
}

macro_rules! impl_human_bytes {
    ($($t:ty),*) => {
        $(
            impl HumanBytes for $t {
                fn human_bytes(&self) -> String {
                    format_bytes(*self as f64)
                }
            }
        )*
    };
}

impl_human_bytes!(usize, u64, u32);
