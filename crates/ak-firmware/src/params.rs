use crate::error::Result;
use crate::image::MemoryImage;

/// Fixed addresses of the operand parameter words.
///
/// The word at `size_addr` holds the problem size (vector length or matrix
/// side); the three words below it hold, descending, the operand pointers:
///
/// ```text
/// size_addr        problem size
/// size_addr -  4   operand A pointer
/// size_addr -  8   operand B pointer
/// size_addr - 12   result pointer
/// ```
///
/// For the default 128 KiB image the size word is the top word of memory,
/// `0x1FFFC`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamLayout {
    size_addr: usize,
}

impl ParamLayout {
    /// Layout whose size word is the top word of `image`.
    pub fn for_image(image: &MemoryImage) -> Self {
        ParamLayout {
            size_addr: image.len() - 4,
        }
    }

    /// Address of the problem-size word.
    pub fn size_addr(&self) -> usize {
        self.size_addr
    }

    /// Address of the operand A pointer word.
    pub fn a_ptr_addr(&self) -> usize {
        self.size_addr - 4
    }

    /// Address of the operand B pointer word.
    pub fn b_ptr_addr(&self) -> usize {
        self.size_addr - 8
    }

    /// Address of the result pointer word.
    pub fn r_ptr_addr(&self) -> usize {
        self.size_addr - 12
    }
}

/// The four parameter words, read once when a program starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamBlock {
    pub size: u32,
    pub a_ptr: u32,
    pub b_ptr: u32,
    pub r_ptr: u32,
}

impl ParamBlock {
    /// Read the parameter words at `layout`.
    pub fn read(image: &MemoryImage, layout: ParamLayout) -> Result<Self> {
        Ok(ParamBlock {
            size: image.read_word(layout.size_addr())?,
            a_ptr: image.read_word(layout.a_ptr_addr())?,
            b_ptr: image.read_word(layout.b_ptr_addr())?,
            r_ptr: image.read_word(layout.r_ptr_addr())?,
        })
    }

    /// Write the parameter words at `layout`.
    pub fn write(&self, image: &mut MemoryImage, layout: ParamLayout) -> Result<()> {
        image.write_word(layout.size_addr(), self.size)?;
        image.write_word(layout.a_ptr_addr(), self.a_ptr)?;
        image.write_word(layout.b_ptr_addr(), self.b_ptr)?;
        image.write_word(layout.r_ptr_addr(), self.r_ptr)?;
        Ok(())
    }
}
