use colored::Color;

pub const PRIMARY: Color = Color::TrueColor { r: 0x7a, g: 0xc7, b: 0xff };
pub const ACCENT: Color = Color::TrueColor { r: 0xff, g: 0xb8, b: 0x6c };
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::White;
pub const IPV4_ADDR: Color = Color::TrueColor { r: 0x8b, g: 0xe9, b: 0xfd };
pub const IPV4_PREFIX: Color = Color::TrueColor { r: 0xbd, g: 0x93, b: 0xf9 };
pub const PASS: Color = Color::BrightGreen;
pub const FAIL: Color = Color::BrightRed;
