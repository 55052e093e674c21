use strata_blocks::MaterialId;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GameMode {
    Creative,
    #[default]
    Survival,
    Adventure,
}

/// Rules deciding whether a player may break or place a material.
///
/// The engine only asks; the rules themselves live with the game.
pub trait PlacementPolicy {
    fn can_place(&self, mode: GameMode, id: MaterialId) -> bool;
    fn can_break(&self, mode: GameMode, id: MaterialId) -> bool;
}
