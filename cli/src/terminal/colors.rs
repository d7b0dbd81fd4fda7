use colored::Color;

pub const PRIMARY: Color = Color::TrueColor { r: 120, g: 200, b: 255 };
pub const ACCENT: Color = Color::TrueColor { r: 255, g: 190, b: 90 };
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::White;

pub const ONLINE: Color = Color::Green;
pub const OFFLINE: Color = Color::Red;
pub const HOSTNAME: Color = Color::TrueColor { r: 180, g: 140, b: 255 };
pub const PORT: Color = Color::Cyan;
pub const ERROR: Color = Color::BrightRed;
