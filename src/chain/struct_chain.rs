use crate::chain::capability::{Capability, ChainStruct};
use crate::errors::{ProfileError, ProfileResult};
use log::trace;
use std::ptr;
use vulkanalia::vk;

#[derive(Debug, Clone)]
struct Slot {
    record: Capability,
    next: Option<usize>,
}

/// # Struct Chain
/// A `pNext` chain of [`Capability`] records, stored in an arena.
///
/// # Details
/// Records are addressed by their slot index and linked through an explicit `next` index
/// instead of raw pointers. Slot `0` is the head and never moves, so extracting a record
/// only re-links its predecessor.
///
/// The raw `next` pointers Vulkan reads are written only inside [`StructChain::with_linked`],
/// for the duration of one call, and reset to null before it returns. Outside of it every
/// record's `next` is null, which makes records safe to copy and move.
#[derive(Debug, Clone)]
pub struct StructChain {
    slots: Vec<Option<Slot>>,
}

impl StructChain {
    pub fn new(head: Capability) -> Self {
        Self {
            slots: vec![Some(Slot { record: head, next: None })],
        }
    }

    /// Chain headed by a typed structure, `StructChain::of(vk::FormatProperties2::default())`.
    pub fn of<T: ChainStruct>(head: T) -> Self {
        Self::new(head.into_capability())
    }

    /// Chain holding a single default record of `tag`.
    pub fn with_head(tag: vk::StructureType) -> ProfileResult<Self> {
        Capability::with_tag(tag)
            .map(Self::new)
            .ok_or(ProfileError::UnregisteredStructure(tag))
    }

    /// Chain headed by `head`, followed by one default record per entry of `tags`.
    ///
    /// Repeated tags and the head's own tag are skipped.
    pub fn from_tags(head: vk::StructureType, tags: &[vk::StructureType]) -> ProfileResult<Self> {
        let mut chain = Self::with_head(head)?;
        for &tag in tags {
            if chain.find(tag).is_some() {
                continue;
            }
            let record = Capability::with_tag(tag).ok_or(ProfileError::UnregisteredStructure(tag))?;
            chain.push(record);
        }
        Ok(chain)
    }

    pub fn head(&self) -> &Capability {
        match &self.slots[0] {
            Some(slot) => &slot.record,
            None => unreachable!("the head slot is never extracted"),
        }
    }

    pub fn head_mut(&mut self) -> &mut Capability {
        match &mut self.slots[0] {
            Some(slot) => &mut slot.record,
            None => unreachable!("the head slot is never extracted"),
        }
    }

    /// Appends `record` at the tail and returns it.
    pub fn push(&mut self, record: Capability) -> &mut Capability {
        let index = self.slots.len();
        let tail = self.tail();
        if let Some(Some(slot)) = self.slots.get_mut(tail) {
            slot.next = Some(index);
        }
        trace!("Chained {:?} at slot {}", record.tag(), index);
        self.slots.push(Some(Slot { record, next: None }));
        match &mut self.slots[index] {
            Some(slot) => &mut slot.record,
            None => unreachable!(),
        }
    }

    /// Records in chain order, head first.
    pub fn iter(&self) -> impl Iterator<Item = &Capability> + '_ {
        self.order().into_iter().filter_map(|index| self.slots[index].as_ref().map(|s| &s.record))
    }

    /// Mutable walk in chain order.
    pub fn for_each_mut(&mut self, mut f: impl FnMut(&mut Capability)) {
        for index in self.order() {
            if let Some(slot) = self.slots[index].as_mut() {
                f(&mut slot.record);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.order().len()
    }

    /// First record tagged `tag`.
    pub fn find(&self, tag: vk::StructureType) -> Option<&Capability> {
        self.position(tag).and_then(|index| self.slots[index].as_ref().map(|s| &s.record))
    }

    pub fn find_mut(&mut self, tag: vk::StructureType) -> Option<&mut Capability> {
        let index = self.position(tag)?;
        self.slots[index].as_mut().map(|s| &mut s.record)
    }

    /// Typed lookup, `chain.get::<vk::PhysicalDeviceVulkan13Features>()`.
    pub fn get<T: ChainStruct>(&self) -> Option<&T> {
        self.find(T::TAG).and_then(T::from_capability)
    }

    pub fn get_mut<T: ChainStruct>(&mut self) -> Option<&mut T> {
        self.find_mut(T::TAG).and_then(T::from_capability_mut)
    }

    /// Removes the first record tagged `tag` and re-links the chain around it.
    ///
    /// The head cannot be extracted; asking for its tag returns `None`.
    pub fn extract(&mut self, tag: vk::StructureType) -> Option<Capability> {
        let order = self.order();
        let at = order.iter().skip(1).position(|&index| self.tag_at(index) == Some(tag))? + 1;
        let (previous, index) = (order[at - 1], order[at]);
        let slot = self.slots[index].take()?;
        if let Some(Some(previous)) = self.slots.get_mut(previous) {
            previous.next = slot.next;
        }
        let mut record = slot.record;
        unsafe { (*record.base_mut()).next = ptr::null_mut() };
        trace!("Extracted {:?} from slot {}", tag, index);
        Some(record)
    }

    /// Distinct tags in first-seen order.
    pub fn collect_tags(&self) -> Vec<vk::StructureType> {
        let mut tags = Vec::new();
        gather_tags(&mut tags, self);
        tags
    }

    /// Links the raw `next` pointers, hands the head to `f`, then unlinks them again.
    ///
    /// This is the only place where the records point at each other, so the chain must
    /// not be touched through any other path while `f` runs.
    pub fn with_linked<R>(&mut self, f: impl FnOnce(&mut Capability) -> R) -> R {
        let order = self.order();
        let slots = self.slots.as_mut_ptr();
        unsafe {
            for pair in order.windows(2) {
                let next = record_ptr(slots, pair[1]);
                (*record_ptr(slots, pair[0])).next = next;
            }
        }
        let result = match unsafe { &mut *slots } {
            Some(slot) => f(&mut slot.record),
            None => unreachable!("the head slot is never extracted"),
        };
        unsafe {
            for &index in &order {
                (*record_ptr(slots, index)).next = ptr::null_mut();
            }
        }
        result
    }

    fn order(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.slots.len());
        let mut current = Some(0);
        while let Some(index) = current {
            order.push(index);
            current = self.slots[index].as_ref().and_then(|s| s.next);
        }
        order
    }

    fn tail(&self) -> usize {
        self.order().last().copied().unwrap_or(0)
    }

    fn tag_at(&self, index: usize) -> Option<vk::StructureType> {
        self.slots[index].as_ref().map(|s| s.record.tag())
    }

    fn position(&self, tag: vk::StructureType) -> Option<usize> {
        self.order().into_iter().find(|&index| self.tag_at(index) == Some(tag))
    }
}

unsafe fn record_ptr(slots: *mut Option<Slot>, index: usize) -> *mut vk::BaseOutStructure {
    match unsafe { &mut *slots.add(index) } {
        Some(slot) => slot.record.base_mut(),
        None => ptr::null_mut(),
    }
}

/// Appends the tags of `chain` that `tags` does not hold yet.
pub fn gather_tags(tags: &mut Vec<vk::StructureType>, chain: &StructChain) {
    for record in chain.iter() {
        let tag = record.tag();
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }
}
