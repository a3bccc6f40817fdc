use orbit::Direction;

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    Rotate(Direction),
    ConfigReload,
}
