use crate::{definitions::rom, RomError};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Represents a single rom with it's information
pub struct Rom {
    /// The rom name
    name: String,
    /// The raw program data, stored on the heap
    /// uses a box for simple execution
    data: Box<[u8]>,
}

impl Rom {
    /// Will generate a new rom based of the given data
    ///
    /// Fails if the data would not fit between the program start and the end of the memory.
    pub fn new<D>(name: &str, data: D) -> Result<Self, RomError>
    where
        D: Into<Box<[u8]>>,
    {
        let data = data.into();
        if data.len() > rom::MAX_SIZE {
            return Err(RomError::TooLarge {
                size: data.len(),
                max: rom::MAX_SIZE,
            });
        }

        Ok(Rom {
            name: name.to_string(),
            data,
        })
    }

    /// Will return a slice internal values of the given data
    pub fn get_data(&self) -> &[u8] {
        &self.data
    }

    /// Will return the name of the rom.
    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
