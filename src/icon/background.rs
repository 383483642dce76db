//! 背景配置：透明（不填充）或不透明纯色。

use std::fmt;

use image::Rgba;

use super::IconError;

/// 画布背景。
///
/// 透明模式下不执行任何填充，画布 alpha 通道完全来自源图。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackgroundConfig {
    #[default]
    Transparent,
    Opaque([u8; 3]),
}

impl BackgroundConfig {
    pub const WHITE: Self = Self::Opaque([255, 255, 255]);

    /// 解析 `transparent` 或十六进制颜色（`#rgb` / `#rrggbb`，`#` 可省略）。
    ///
    /// # 示例
    /// ```rust
    /// use pwa_icongen::icon::BackgroundConfig;
    ///
    /// assert_eq!(BackgroundConfig::parse("#fff")?, BackgroundConfig::WHITE);
    /// assert_eq!(BackgroundConfig::parse("transparent")?, BackgroundConfig::Transparent);
    /// # Ok::<(), pwa_icongen::icon::IconError>(())
    /// ```
    pub fn parse(value: &str) -> Result<Self, IconError> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("transparent") {
            return Ok(Self::Transparent);
        }

        let hex = value.strip_prefix('#').unwrap_or(value);
        let expanded: String = match hex.len() {
            3 => hex.chars().flat_map(|c| [c, c]).collect(),
            6 => hex.to_string(),
            _ => {
                return Err(IconError::InvalidFormat(format!(
                    "无法识别的颜色：{}（示例：#3b82f6 / #fff / transparent）",
                    value
                )));
            }
        };

        if !expanded.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(IconError::InvalidFormat(format!("颜色不是合法的十六进制：{}", value)));
        }
        let packed = u32::from_str_radix(&expanded, 16)
            .map_err(|_| IconError::InvalidFormat(format!("颜色不是合法的十六进制：{}", value)))?;

        Ok(Self::Opaque([
            ((packed >> 16) & 0xff) as u8,
            ((packed >> 8) & 0xff) as u8,
            (packed & 0xff) as u8,
        ]))
    }

    /// 填充色（完全不透明）；透明模式返回 `None`，表示跳过填充。
    pub fn fill(&self) -> Option<Rgba<u8>> {
        match *self {
            Self::Transparent => None,
            Self::Opaque([r, g, b]) => Some(Rgba([r, g, b, 255])),
        }
    }

    pub fn is_transparent(&self) -> bool {
        matches!(self, Self::Transparent)
    }
}

impl fmt::Display for BackgroundConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transparent => f.write_str("transparent"),
            Self::Opaque([r, g, b]) => write!(f, "#{:02x}{:02x}{:02x}", r, g, b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_and_short_hex() {
        assert_eq!(
            BackgroundConfig::parse("#3b82f6").expect("long hex"),
            BackgroundConfig::Opaque([0x3b, 0x82, 0xf6])
        );
        assert_eq!(
            BackgroundConfig::parse("0af").expect("short hex"),
            BackgroundConfig::Opaque([0x00, 0xaa, 0xff])
        );
    }

    #[test]
    fn rejects_garbage() {
        for bad in ["", "#12", "#zzzzzz", "blue", "#1234567"] {
            assert!(
                matches!(BackgroundConfig::parse(bad), Err(IconError::InvalidFormat(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn display_roundtrips() {
        let bg = BackgroundConfig::Opaque([1, 2, 255]);
        assert_eq!(bg.to_string(), "#0102ff");
        assert_eq!(BackgroundConfig::parse(&bg.to_string()).expect("roundtrip"), bg);
        assert_eq!(BackgroundConfig::Transparent.to_string(), "transparent");
    }

    #[test]
    fn transparent_has_no_fill() {
        assert!(BackgroundConfig::Transparent.fill().is_none());
        assert_eq!(BackgroundConfig::WHITE.fill(), Some(Rgba([255, 255, 255, 255])));
    }
}
