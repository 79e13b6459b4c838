// Keyboard and pointer input mapping
use protocol::MoveDirection;

/// Arrow keys request continuous movement; everything else is left to the page.
pub fn direction_for_key(key: &str) -> Option<MoveDirection> {
    match key {
        "ArrowUp" => Some(MoveDirection::Up),
        "ArrowDown" => Some(MoveDirection::Down),
        "ArrowLeft" => Some(MoveDirection::Left),
        "ArrowRight" => Some(MoveDirection::Right),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrow_keys() {
        assert_eq!(direction_for_key("ArrowUp"), Some(MoveDirection::Up));
        assert_eq!(direction_for_key("ArrowDown"), Some(MoveDirection::Down));
        assert_eq!(direction_for_key("ArrowLeft"), Some(MoveDirection::Left));
        assert_eq!(direction_for_key("ArrowRight"), Some(MoveDirection::Right));
    }

    #[test]
    fn test_other_keys_ignored() {
        for key in ["w", "a", " ", "Enter", "arrowup", "Up"] {
            assert_eq!(direction_for_key(key), None, "{key}");
        }
    }
}
