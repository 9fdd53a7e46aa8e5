use log::debug;

use crate::combine::Resolver;
use crate::error::{Error, Result};
use crate::geometry::{self, Position};
use crate::items::Item;

// ---------------------------------------------------------------------------
// ItemId — generational index
// ---------------------------------------------------------------------------

/// Handle to an item lying in the world. Handles go stale once the item is
/// picked up or consumed, even if the slot is later reused.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ItemId {
    id: u32,
    generation: u32,
}

impl ItemId {
    pub fn id(self) -> u32 {
        self.id
    }

    pub fn generation(self) -> u32 {
        self.generation
    }
}

// ---------------------------------------------------------------------------
// IdAllocator
// ---------------------------------------------------------------------------

struct IdAllocator {
    generations: Vec<u32>,
    free: Vec<u32>,
    next_id: u32,
}

impl IdAllocator {
    fn new() -> Self {
        Self {
            generations: Vec::new(),
            free: Vec::new(),
            next_id: 0,
        }
    }

    fn allocate(&mut self) -> ItemId {
        if let Some(id) = self.free.pop() {
            ItemId {
                id,
                generation: self.generations[id as usize],
            }
        } else {
            let id = self.next_id;
            self.next_id += 1;
            self.generations.push(0);
            ItemId { id, generation: 0 }
        }
    }

    fn deallocate(&mut self, item: ItemId) -> bool {
        if !self.is_alive(item) {
            return false;
        }
        let generation = &mut self.generations[item.id as usize];
        *generation = generation.wrapping_add(1);
        self.free.push(item.id);
        true
    }

    fn is_alive(&self, item: ItemId) -> bool {
        let idx = item.id as usize;
        idx < self.generations.len() && self.generations[idx] == item.generation
    }
}

// ---------------------------------------------------------------------------
// SparseItems — packed storage indexed by id
// ---------------------------------------------------------------------------

const EMPTY: u32 = u32::MAX;

struct SparseItems {
    sparse: Vec<u32>,
    dense: Vec<u32>,
    data: Vec<Item>,
}

impl SparseItems {
    fn new() -> Self {
        Self {
            sparse: Vec::new(),
            dense: Vec::new(),
            data: Vec::new(),
        }
    }

    fn insert(&mut self, id: u32, item: Item) {
        let idx = id as usize;
        if idx >= self.sparse.len() {
            self.sparse.resize(idx + 1, EMPTY);
        }
        if self.sparse[idx] != EMPTY {
            let dense_idx = self.sparse[idx] as usize;
            self.data[dense_idx] = item;
        } else {
            self.sparse[idx] = self.dense.len() as u32;
            self.dense.push(id);
            self.data.push(item);
        }
    }

    fn remove(&mut self, id: u32) -> Option<Item> {
        let idx = id as usize;
        if idx >= self.sparse.len() || self.sparse[idx] == EMPTY {
            return None;
        }
        let dense_idx = self.sparse[idx] as usize;
        self.sparse[idx] = EMPTY;

        // Swap-remove to keep arrays packed.
        let last = self.dense.len() - 1;
        if dense_idx != last {
            let moved_id = self.dense[last] as usize;
            self.sparse[moved_id] = dense_idx as u32;
        }
        self.dense.swap_remove(dense_idx);
        Some(self.data.swap_remove(dense_idx))
    }

    fn get(&self, id: u32) -> Option<&Item> {
        let idx = id as usize;
        if idx >= self.sparse.len() || self.sparse[idx] == EMPTY {
            return None;
        }
        Some(&self.data[self.sparse[idx] as usize])
    }
}

// ---------------------------------------------------------------------------
// ItemWorld
// ---------------------------------------------------------------------------

/// Every item currently lying on the map, fixtures included.
pub struct ItemWorld {
    allocator: IdAllocator,
    items: SparseItems,
}

impl ItemWorld {
    pub fn new() -> Self {
        Self {
            allocator: IdAllocator::new(),
            items: SparseItems::new(),
        }
    }

    pub fn spawn(&mut self, item: Item) -> ItemId {
        let handle = self.allocator.allocate();
        self.items.insert(handle.id, item);
        debug!("spawned {} at ({}, {})", item.kind, item.position.x, item.position.y);
        handle
    }

    /// Remove an item, returning it. `None` for stale handles.
    pub fn despawn(&mut self, handle: ItemId) -> Option<Item> {
        if !self.allocator.deallocate(handle) {
            return None;
        }
        self.items.remove(handle.id)
    }

    pub fn is_alive(&self, handle: ItemId) -> bool {
        self.allocator.is_alive(handle)
    }

    pub fn get(&self, handle: ItemId) -> Option<&Item> {
        if !self.is_alive(handle) {
            return None;
        }
        self.items.get(handle.id)
    }

    pub fn len(&self) -> usize {
        self.items.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.data.is_empty()
    }

    /// All live items, in storage order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (ItemId, &Item)> + '_ {
        let generations = &self.allocator.generations;
        self.items.dense.iter().zip(&self.items.data).map(move |(&id, item)| {
            (ItemId { id, generation: generations[id as usize] }, item)
        })
    }

    /// The closest item within `reach` of `origin` (Chebyshev distance), ties
    /// broken by Manhattan distance and then by id.
    pub fn nearest_within(&self, origin: Position, reach: i32) -> Option<(ItemId, &Item)> {
        self.iter()
            .filter(|(_, item)| geometry::within_reach(origin, item.position, reach))
            .min_by_key(|(handle, item)| {
                (
                    geometry::distance_chebyshev(origin, item.position),
                    geometry::distance_manhattan(origin, item.position),
                    handle.id,
                )
            })
    }

    /// Info-box text for whatever the player is standing next to.
    pub fn hint(&self, origin: Position, reach: i32) -> Option<String> {
        self.nearest_within(origin, reach).map(|(_, item)| item.help_text())
    }
}

impl Default for ItemWorld {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Hands — what the player is carrying
// ---------------------------------------------------------------------------

/// Outcome of a successful combination through [`Hands`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Reacted {
    /// The new item, now held in the hand slot that held the first reactant.
    pub result: Item,
    /// The byproduct, if any, dropped into the world next to the reactants.
    pub byproduct: Option<ItemId>,
}

/// The player's hands: a fixed number of slots, each empty or holding one item.
#[derive(Clone, Debug)]
pub struct Hands {
    slots: Vec<Option<Item>>,
}

impl Hands {
    pub fn new(capacity: usize) -> Self {
        Self { slots: vec![None; capacity] }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn held(&self, slot: usize) -> Option<&Item> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    /// Occupied slots with their contents.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Item)> + '_ {
        self.slots.iter().enumerate().filter_map(|(i, s)| s.as_ref().map(|item| (i, item)))
    }

    pub fn is_full(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    fn take_held(&self, slot: usize) -> Result<Item> {
        self.held(slot).copied().ok_or(Error::EmptySlot(slot))
    }

    /// Move an item from the world into the first free hand. Returns the slot.
    pub fn pick_up(&mut self, world: &mut ItemWorld, handle: ItemId) -> Result<usize> {
        let item = *world.get(handle).ok_or(Error::NoSuchItem)?;
        if item.kind.is_fixture() {
            return Err(Error::NotPickable(item.kind));
        }
        let slot = self.slots.iter().position(Option::is_none).ok_or(Error::HandsFull)?;

        world.despawn(handle);
        self.slots[slot] = Some(item);
        debug!("picked up {} into hand {slot}", item.kind);
        Ok(slot)
    }

    /// Put a held item down at `at`.
    pub fn drop_item(&mut self, slot: usize, world: &mut ItemWorld, at: Position) -> Result<ItemId> {
        let item = self.take_held(slot)?;
        self.slots[slot] = None;
        Ok(world.spawn(Item::new(item.kind, at)))
    }

    /// Combine the items in two hand slots while standing at `at`.
    ///
    /// On a reaction both reactants are used up: the result goes into slot `a`,
    /// slot `b` is emptied and any byproduct is dropped at `at`. Returns
    /// `Ok(None)` and changes nothing when the items do not react.
    pub fn combine_held(
        &mut self,
        a: usize,
        b: usize,
        resolver: &Resolver,
        world: &mut ItemWorld,
        at: Position,
    ) -> Result<Option<Reacted>> {
        let first = Item::new(self.take_held(a)?.kind, at);
        let second = Item::new(self.take_held(b)?.kind, at);
        if a == b {
            return Ok(None);
        }

        let combination = resolver.combine(&first, &second);
        let Some(result) = combination.result else {
            return Ok(None);
        };

        self.slots[a] = Some(result);
        self.slots[b] = None;
        let byproduct = combination.byproduct.map(|item| world.spawn(item));
        Ok(Some(Reacted { result, byproduct }))
    }

    /// Combine a held item with something in the world, e.g. a bucket with a
    /// river or sugary lemon water with a fire.
    ///
    /// The held item is replaced by the result. The world item is consumed
    /// unless it is a fixture. Products land at the world item's position when
    /// it is consumed, otherwise at `at`, where the player stands.
    pub fn combine_with_world(
        &mut self,
        slot: usize,
        handle: ItemId,
        resolver: &Resolver,
        world: &mut ItemWorld,
        at: Position,
    ) -> Result<Option<Reacted>> {
        let held = self.take_held(slot)?;
        let target = *world.get(handle).ok_or(Error::NoSuchItem)?;

        let consumed_at = if target.kind.is_fixture() { at } else { target.position };
        let combination = resolver.combine(&Item::new(held.kind, consumed_at), &target);
        let Some(result) = combination.result else {
            return Ok(None);
        };

        if !target.kind.is_fixture() {
            world.despawn(handle);
        }
        self.slots[slot] = Some(result);
        let byproduct = combination.byproduct.map(|item| world.spawn(item));
        Ok(Some(Reacted { result, byproduct }))
    }
}

impl Default for Hands {
    fn default() -> Self {
        Self::new(2)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::ItemKind;

    #[test]
    fn spawn_returns_unique_handles() {
        let mut world = ItemWorld::new();
        let a = world.spawn(Item::at(ItemKind::Lemon, 0, 0));
        let b = world.spawn(Item::at(ItemKind::Lemon, 0, 0));
        assert_ne!(a, b);
        assert_eq!(world.len(), 2);
    }

    #[test]
    fn generation_prevents_stale_access() {
        let mut world = ItemWorld::new();
        let old = world.spawn(Item::at(ItemKind::Soap, 1, 1));
        world.despawn(old);

        let new = world.spawn(Item::at(ItemKind::Sugar, 2, 2));
        assert_eq!(old.id(), new.id());
        assert_ne!(old.generation(), new.generation());
        assert!(world.get(old).is_none());
        assert_eq!(world.get(new).map(|i| i.kind), Some(ItemKind::Sugar));
    }

    #[test]
    fn swap_remove_preserves_other_entries() {
        let mut world = ItemWorld::new();
        let a = world.spawn(Item::at(ItemKind::Lemon, 1, 0));
        let b = world.spawn(Item::at(ItemKind::Sugar, 2, 0));
        let c = world.spawn(Item::at(ItemKind::Soap, 3, 0));

        world.despawn(b);

        assert_eq!(world.get(a).map(|i| i.kind), Some(ItemKind::Lemon));
        assert!(world.get(b).is_none());
        assert_eq!(world.get(c).map(|i| i.kind), Some(ItemKind::Soap));
        assert_eq!(world.iter().count(), 2);
    }

    #[test]
    fn despawn_twice_returns_none() {
        let mut world = ItemWorld::new();
        let a = world.spawn(Item::at(ItemKind::Lemon, 0, 0));
        assert!(world.despawn(a).is_some());
        assert!(world.despawn(a).is_none());
    }

    #[test]
    fn nearest_within_prefers_closest() {
        let mut world = ItemWorld::new();
        world.spawn(Item::at(ItemKind::Shovel, 40, 0));
        let near = world.spawn(Item::at(ItemKind::Flower, 10, 10));
        world.spawn(Item::at(ItemKind::Lemon, 500, 500));

        let (found, _) = world.nearest_within(Position::new(0, 0), 48).unwrap();
        assert_eq!(found, near);
        assert_eq!(world.hint(Position::new(0, 0), 48).as_deref(), Some("pickup the flower"));
        assert!(world.nearest_within(Position::new(1000, 1000), 48).is_none());
    }

    #[test]
    fn nearest_within_ignores_items_at_coordinate_extremes() {
        let mut world = ItemWorld::new();
        world.spawn(Item::at(ItemKind::Lemon, i32::MIN, 0));
        world.spawn(Item::at(ItemKind::Sugar, i32::MAX, i32::MIN));

        assert!(world.nearest_within(Position::new(10, 0), 48).is_none());
        assert_eq!(world.hint(Position::new(10, 0), 48), None);
    }

    #[test]
    fn generation_wraps_instead_of_overflowing() {
        let mut alloc = IdAllocator::new();
        let first = alloc.allocate();
        alloc.generations[first.id as usize] = u32::MAX;
        let handle = ItemId { id: first.id, generation: u32::MAX };

        assert!(alloc.deallocate(handle));
        let reused = alloc.allocate();
        assert_eq!(reused.generation, 0);
        assert!(!alloc.is_alive(handle));
    }

    #[test]
    fn combine_same_slot_is_no_reaction() {
        let mut world = ItemWorld::new();
        let mut hands = Hands::default();
        let id = world.spawn(Item::at(ItemKind::Lemon, 0, 0));
        hands.pick_up(&mut world, id).unwrap();
        let out = hands.combine_held(0, 0, &Resolver::new(), &mut world, Position::ZERO).unwrap();
        assert!(out.is_none());
        assert_eq!(hands.held(0).map(|i| i.kind), Some(ItemKind::Lemon));
    }
}
