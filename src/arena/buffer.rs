use crate::{
    foundation::error::{FramepassError, FramepassResult},
    layout::plan::LayoutPlan,
};

/// Arena configuration.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ArenaOpts {
    /// Records allocated up front.
    pub initial_capacity: usize,
    /// Multiplicative capacity growth applied when an acquire finds the arena full.
    pub growth_factor: f64,
}

impl Default for ArenaOpts {
    fn default() -> Self {
        Self {
            initial_capacity: 0,
            growth_factor: 2.0,
        }
    }
}

impl ArenaOpts {
    /// Parse options from JSON. Missing keys take their default values.
    pub fn from_json(json: &str) -> FramepassResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    fn validate(&self) -> FramepassResult<()> {
        if !self.growth_factor.is_finite() || self.growth_factor <= 1.0 {
            return Err(FramepassError::invalid_config(format!(
                "growth_factor must be a finite number > 1, got {}",
                self.growth_factor
            )));
        }
        Ok(())
    }
}

/// Handle to one record slot of a [`BufferArena`].
///
/// A view stays bound to its slot for the arena's lifetime. Releasing a record moves the last
/// live record's contents into the released slot, so the *occupant* of a slot can change while
/// the view itself stays valid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordView {
    index: usize,
}

impl RecordView {
    /// Slot position inside the arena.
    pub fn index(self) -> usize {
        self.index
    }
}

/// Destination for [`BufferArena::sync`], typically a GPU vertex buffer.
pub trait BufferSink {
    /// Current allocation size in bytes.
    fn capacity_bytes(&self) -> usize;

    /// (Re)allocate to exactly `bytes`. Previous contents need not be preserved.
    fn allocate(&mut self, bytes: usize) -> FramepassResult<()>;

    /// Write `bytes` starting at `offset_bytes`.
    fn write(&mut self, offset_bytes: usize, bytes: &[u8]) -> FramepassResult<()>;
}

/// Growable pool of fixed-layout records interleaved in one `f32` backing store.
///
/// Performance characteristics:
/// - `acquire()` is O(1) amortized, O(n) when the store grows
/// - `release()` is O(stride) (swap with the last live record)
/// - `clear()` is O(1) and leaves memory untouched
#[derive(Debug)]
pub struct BufferArena {
    plan: LayoutPlan,
    opts: ArenaOpts,
    data: Vec<f32>,
    capacity: usize,
    live: usize,
}

impl BufferArena {
    /// Build an arena for records laid out by `plan`.
    ///
    /// Fails with [`FramepassError::InvalidConfig`] for an unusable growth factor and with
    /// [`FramepassError::Allocation`] when the initial capacity cannot be allocated.
    pub fn new(plan: LayoutPlan, opts: ArenaOpts) -> FramepassResult<Self> {
        opts.validate()?;
        let mut arena = Self {
            plan,
            opts,
            data: Vec::new(),
            capacity: 0,
            live: 0,
        };
        if opts.initial_capacity > 0 {
            arena.resize_to(opts.initial_capacity)?;
        }
        Ok(arena)
    }

    /// Record layout.
    pub fn plan(&self) -> &LayoutPlan {
        &self.plan
    }

    /// Number of live records.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Whether no record is live.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Records the backing store can hold without growing.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Mark the next free record live and return its view, growing the store when full.
    pub fn acquire(&mut self) -> FramepassResult<RecordView> {
        if self.live == self.capacity {
            self.grow()?;
        }
        let view = RecordView { index: self.live };
        self.live += 1;
        Ok(view)
    }

    /// Swap-remove the record behind `view`.
    ///
    /// The last live record's contents move into `view`'s slot. Releasing from an empty
    /// arena, or releasing a view that is already outside the live range, does nothing.
    pub fn release(&mut self, view: RecordView) {
        if self.live == 0 {
            return;
        }
        if view.index >= self.live {
            tracing::debug!(
                index = view.index,
                live = self.live,
                "release of a free record ignored"
            );
            return;
        }

        let last = self.live - 1;
        if view.index != last {
            self.swap_records(view.index, last);
        }
        self.live = last;
    }

    /// Mark every record free. Backing memory is left as is.
    pub fn clear(&mut self) {
        self.live = 0;
    }

    /// Ensure room for at least `records` records without further growth.
    pub fn reserve(&mut self, records: usize) -> FramepassResult<()> {
        if records > self.capacity {
            self.resize_to(records)?;
        }
        Ok(())
    }

    /// Views of the live records, in slot order.
    pub fn views(&self) -> impl Iterator<Item = RecordView> + use<> {
        (0..self.live).map(|index| RecordView { index })
    }

    /// Read access to the record in `view`'s slot.
    pub fn record(&self, view: RecordView) -> FramepassResult<Record<'_>> {
        let range = self.slot_range(view)?;
        Ok(Record {
            plan: &self.plan,
            data: &self.data[range],
        })
    }

    /// Write access to the record in `view`'s slot.
    pub fn record_mut(&mut self, view: RecordView) -> FramepassResult<RecordMut<'_>> {
        let range = self.slot_range(view)?;
        Ok(RecordMut {
            plan: &self.plan,
            data: &mut self.data[range],
        })
    }

    /// Shorthand for `record(view)?.get(field)`.
    pub fn get(&self, view: RecordView, field: &str) -> FramepassResult<&[f32]> {
        let range = self.slot_range(view)?;
        let field_range = field_range(&self.plan, field)?;
        Ok(&self.data[range][field_range])
    }

    /// Shorthand for `record_mut(view)?.set(field, values)`.
    pub fn set(&mut self, view: RecordView, field: &str, values: &[f32]) -> FramepassResult<()> {
        self.record_mut(view)?.set(field, values)
    }

    /// Elements of the live records, ready for upload.
    pub fn live_data(&self) -> &[f32] {
        &self.data[..self.plan.sizeof(self.live)]
    }

    /// [`BufferArena::live_data`] as raw bytes.
    pub fn live_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.live_data())
    }

    /// Push the live records to `sink`, reallocating it when the arena outgrew it.
    pub fn sync(&self, sink: &mut dyn BufferSink) -> FramepassResult<()> {
        let capacity_bytes = self.plan.stride_bytes() * self.capacity;
        if sink.capacity_bytes() < capacity_bytes {
            tracing::debug!(bytes = capacity_bytes, "reallocating arena sink");
            sink.allocate(capacity_bytes)?;
        }
        if self.live > 0 {
            sink.write(0, self.live_bytes())?;
        }
        Ok(())
    }

    fn grow(&mut self) -> FramepassResult<()> {
        let scaled = (self.capacity as f64 * self.opts.growth_factor).ceil();
        let scaled = if scaled.is_finite() && scaled < usize::MAX as f64 {
            scaled as usize
        } else {
            usize::MAX
        };
        let new_capacity = scaled.max(self.capacity.saturating_add(1)).max(1);
        self.resize_to(new_capacity)
    }

    fn resize_to(&mut self, new_capacity: usize) -> FramepassResult<()> {
        let new_len = self.plan.stride().checked_mul(new_capacity).ok_or_else(|| {
            FramepassError::allocation(format!("{new_capacity} records overflow the address space"))
        })?;
        let additional = new_len.saturating_sub(self.data.len());
        self.data.try_reserve_exact(additional).map_err(|e| {
            FramepassError::allocation(format!("growing arena to {new_capacity} records: {e}"))
        })?;
        self.data.resize(new_len, 0.0);

        tracing::debug!(from = self.capacity, to = new_capacity, "arena grew");
        self.capacity = new_capacity;
        Ok(())
    }

    fn slot_range(&self, view: RecordView) -> FramepassResult<std::ops::Range<usize>> {
        if view.index >= self.capacity {
            return Err(FramepassError::validation(format!(
                "record view {} is outside an arena of capacity {}",
                view.index, self.capacity
            )));
        }
        let stride = self.plan.stride();
        let start = view.index * stride;
        Ok(start..start + stride)
    }

    fn swap_records(&mut self, a: usize, b: usize) {
        let stride = self.plan.stride();
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        let (head, tail) = self.data.split_at_mut(hi * stride);
        head[lo * stride..(lo + 1) * stride].swap_with_slice(&mut tail[..stride]);
    }
}

fn field_range(plan: &LayoutPlan, field: &str) -> FramepassResult<std::ops::Range<usize>> {
    plan.field(field)
        .map(|f| f.range())
        .ok_or_else(|| FramepassError::UnknownField(field.to_owned()))
}

/// Read-only projection of one record.
#[derive(Clone, Copy, Debug)]
pub struct Record<'a> {
    plan: &'a LayoutPlan,
    data: &'a [f32],
}

impl<'a> Record<'a> {
    /// Elements of `field`.
    pub fn get(&self, field: &str) -> FramepassResult<&'a [f32]> {
        Ok(&self.data[field_range(self.plan, field)?])
    }

    /// The whole record.
    pub fn as_slice(&self) -> &'a [f32] {
        self.data
    }
}

/// Mutable projection of one record. Writes land directly in the arena's backing store.
#[derive(Debug)]
pub struct RecordMut<'a> {
    plan: &'a LayoutPlan,
    data: &'a mut [f32],
}

impl RecordMut<'_> {
    /// Elements of `field`.
    pub fn get(&self, field: &str) -> FramepassResult<&[f32]> {
        Ok(&self.data[field_range(self.plan, field)?])
    }

    /// Mutable elements of `field`.
    pub fn get_mut(&mut self, field: &str) -> FramepassResult<&mut [f32]> {
        let range = field_range(self.plan, field)?;
        Ok(&mut self.data[range])
    }

    /// Overwrite `field`. `values` must have exactly the field's element count.
    pub fn set(&mut self, field: &str, values: &[f32]) -> FramepassResult<()> {
        let slot = self.get_mut(field)?;
        if slot.len() != values.len() {
            return Err(FramepassError::FieldShape {
                field: field.to_owned(),
                expected: slot.len(),
                actual: values.len(),
            });
        }
        slot.copy_from_slice(values);
        Ok(())
    }

    /// The whole record, mutably.
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        self.data
    }
}

#[cfg(test)]
#[path = "../../tests/unit/arena/buffer.rs"]
mod tests;
