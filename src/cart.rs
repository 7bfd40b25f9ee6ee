use std::fmt;

/// The unit of transport. A cart is plain data: it is exclusively owned by
/// exactly one stop or one in-transit engine at any instant, so it carries
/// no synchronization of its own.
#[derive(Debug)]
pub struct Cart {
    id: u32,
    gems: u32,
}

impl Cart {
    /// Create an empty cart.
    #[inline]
    pub fn new(id: u32) -> Self {
        Self { id, gems: 0 }
    }

    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Number of gems loaded so far. Only ever increases, by one per
    /// successful station load.
    #[inline]
    pub fn gems(&self) -> u32 {
        self.gems
    }

    /// Called by a station while holding its lock.
    #[inline]
    pub(crate) fn load_gem(&mut self) {
        self.gems += 1;
    }
}

impl fmt::Display for Cart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cart {}", self.id)
    }
}
