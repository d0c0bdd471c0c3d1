//! Effects - side effects declared by the reducer

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Run the Pokemon query against `endpoint`; `refresh` skips the cache read
    FetchPokemon {
        endpoint: String,
        use_cache: bool,
        refresh: bool,
    },
    /// Download and decode one sprite
    LoadSprite {
        id: u32,
        url: String,
        use_cache: bool,
    },
}
