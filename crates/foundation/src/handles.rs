/// Generational handle to an object living on a render surface.
///
/// A surface that recycles an index must bump the generation, so a handle
/// captured before a detach never compares equal to the recycled one.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RenderHandle(u32, u32); // (index, generation)

impl RenderHandle {
    pub fn new(index: u32, generation: u32) -> Self {
        RenderHandle(index, generation)
    }

    pub fn index(&self) -> u32 {
        self.0
    }

    pub fn generation(&self) -> u32 {
        self.1
    }
}
