// Helper utilities, logging, guest names

/// Log to browser console
#[macro_export]
macro_rules! console_log {
    ($($t:tt)*) => {
        web_sys::console::log_1(&format!($($t)*).into())
    }
}

/// Warn in browser console
#[macro_export]
macro_rules! console_warn {
    ($($t:tt)*) => {
        web_sys::console::warn_1(&format!($($t)*).into())
    }
}

/// Error in browser console
#[macro_export]
macro_rules! console_error {
    ($($t:tt)*) => {
        web_sys::console::error_1(&format!($($t)*).into())
    }
}

/// Random display name used when the page does not supply one.
pub fn guest_name() -> String {
    let mut bytes = [0u8; 2];
    let suffix = match getrandom::getrandom(&mut bytes) {
        Ok(()) => u16::from_le_bytes(bytes) % 10_000,
        Err(_) => 0,
    };
    format_guest_name(suffix)
}

fn format_guest_name(suffix: u16) -> String {
    format!("Guest{:04}", suffix % 10_000)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guest_name_is_zero_padded() {
        assert_eq!(format_guest_name(7), "Guest0007");
        assert_eq!(format_guest_name(12_345), "Guest2345");
    }
}
