//! A direct-mapped cache of previously searched positions
//!
//! The table trades accuracy for footprint: each position key maps to
//! exactly one slot and a store silently overwrites whatever lived
//! there, so a shallow entry can evict a deeper one. A key mismatch on
//! lookup is simply a cache miss, never an error.

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::mem::size_of;
use std::path::Path;

use crate::{board::Board, error::Error, position_key::encode};

/// How a cached value relates to the true value of its position
#[repr(u8)]
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Flag {
    /// The slot holds no usable data
    Invalid = 0,
    /// The value is the position's exact search value
    Exact = 1,
    /// The value is a lower bound established by a beta cutoff
    LowerBound = 2,
    /// The value is an upper bound established by a fail-low
    UpperBound = 3,
}

impl Flag {
    fn from_u8(byte: u8) -> Self {
        match byte {
            1 => Flag::Exact,
            2 => Flag::LowerBound,
            3 => Flag::UpperBound,
            _ => Flag::Invalid,
        }
    }
}

/// One cached search result
///
/// The full position key is kept so that index collisions between
/// different positions are detected by comparison rather than trusted.
#[derive(Copy, Clone, Debug)]
pub struct Entry {
    pub key: u64,
    pub value: i32,
    pub depth: u8,
    pub flag: Flag,
}

impl Entry {
    pub fn invalid() -> Self {
        Self {
            key: 0,
            value: 0,
            depth: 0,
            flag: Flag::Invalid,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.flag != Flag::Invalid
    }
}

// on-disk record: key, value, depth, flag with no padding or header
const RECORD_SIZE: u64 = 14;

/// A fixed-capacity transposition table
///
/// Allocated once per game from a byte budget and exclusively owned by
/// the driver; the solver only borrows it for the duration of a move
/// decision.
pub struct TranspositionTable {
    entries: Vec<Entry>,
}

impl TranspositionTable {
    /// Creates a table of `byte_budget / entry_size` slots, all invalid
    ///
    /// Fails with [`Error::TableAllocation`] if the budget rounds down
    /// to zero slots or the backing memory cannot be reserved.
    pub fn with_byte_budget(byte_budget: usize) -> Result<Self, Error> {
        let capacity = byte_budget / size_of::<Entry>();
        if capacity == 0 {
            return Err(Error::TableAllocation(byte_budget));
        }
        let mut entries = Vec::new();
        entries
            .try_reserve_exact(capacity)
            .map_err(|_| Error::TableAllocation(byte_budget))?;
        entries.resize(capacity, Entry::invalid());
        Ok(Self { entries })
    }

    /// The number of slots in the table
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Fetches the cached entry for `board`, or an invalid entry on a
    /// miss
    ///
    /// An occupied slot whose key belongs to a different position is a
    /// miss, not a collision to resolve.
    pub fn lookup(&self, board: &Board) -> Entry {
        let key = encode(board);
        let entry = self.entries[(key % self.entries.len() as u64) as usize];
        if entry.is_valid() && entry.key == key {
            entry
        } else {
            Entry::invalid()
        }
    }

    /// Caches a search result for `board`, overwriting whatever
    /// occupied its slot
    pub fn store(&mut self, board: &Board, depth: u8, flag: Flag, value: i32) {
        let key = encode(board);
        let index = (key % self.entries.len() as u64) as usize;
        self.entries[index] = Entry {
            key,
            value,
            depth,
            flag,
        };
    }

    /// The fraction of slots holding valid entries, for diagnostics
    pub fn occupancy(&self) -> f64 {
        let used = self.entries.iter().filter(|e| e.is_valid()).count();
        used as f64 / self.entries.len() as f64
    }

    /// Writes the raw entry array to `path` in fixed record order
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let mut file = BufWriter::new(File::create(path)?);
        for entry in &self.entries {
            file.write_u64::<BigEndian>(entry.key)?;
            file.write_i32::<BigEndian>(entry.value)?;
            file.write_u8(entry.depth)?;
            file.write_u8(entry.flag as u8)?;
        }
        file.flush()?;
        Ok(())
    }

    /// Reads a table previously written by [`save`], restoring its
    /// capacity from the file length
    ///
    /// Files whose length is not an exact multiple of the record size
    /// are rejected as malformed.
    ///
    /// [`save`]: TranspositionTable::save
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let file = File::open(path)?;
        let len = file.metadata()?.len();
        if len == 0 || len % RECORD_SIZE != 0 {
            return Err(Error::MalformedTableFile(len));
        }

        let mut reader = BufReader::new(file);
        let capacity = (len / RECORD_SIZE) as usize;
        let mut entries = Vec::new();
        entries
            .try_reserve_exact(capacity)
            .map_err(|_| Error::TableAllocation(len as usize))?;
        for _ in 0..capacity {
            let key = reader.read_u64::<BigEndian>()?;
            let value = reader.read_i32::<BigEndian>()?;
            let depth = reader.read_u8()?;
            let flag = Flag::from_u8(reader.read_u8()?);
            entries.push(Entry {
                key,
                value,
                depth,
                flag,
            });
        }
        Ok(Self { entries })
    }
}
