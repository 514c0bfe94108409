pub mod list;
pub mod place;
pub mod reserve;

/// Parses a window handle from a string (decimal or 0x hex).
pub fn parse_hwnd(s: &str) -> Result<usize, String> {
    let parsed = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        usize::from_str_radix(hex, 16)
    } else {
        s.parse()
    };
    parsed.map_err(|e| format!("invalid window handle '{s}': {e}"))
}
