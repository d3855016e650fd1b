//! 시스코풍 프롬프트 문자열 조립.

/// `hostname(menu)#` 꼴의 프롬프트를 만든다.
/// 특권 모드는 `#`, 일반 모드는 `>`로 끝난다.
pub(super) fn device_prompt(hostname: &str, enabled: bool, menu: Option<&str>) -> String {
    let menu_indicator = menu.map(|menu| format!("({menu})")).unwrap_or_default();
    let mode_indicator = if enabled { '#' } else { '>' };
    format!("{hostname}{menu_indicator}{mode_indicator} ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_prompt_ends_with_angle_bracket() {
        assert_eq!(device_prompt("switch1", false, None), "switch1> ");
    }

    #[test]
    fn enabled_prompt_ends_with_hash() {
        assert_eq!(device_prompt("switch1", true, None), "switch1# ");
    }

    #[test]
    fn menu_name_is_parenthesized() {
        assert_eq!(
            device_prompt("switch1", true, Some("config")),
            "switch1(config)# "
        );
    }
}
