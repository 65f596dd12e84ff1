//! SSD1306 command set
//!
//! Only the commands this driver issues. Multi-byte commands take their
//! arguments as plain payload bytes after the opcode.

pub const DISPLAY_OFF: u8 = 0xAE;
pub const DISPLAY_ON: u8 = 0xAF;
pub const SET_CONTRAST: u8 = 0x81;
pub const SET_CLOCK_DIV: u8 = 0xD5;
pub const SET_MUX_RATIO: u8 = 0xA8;
pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
pub const SET_START_LINE: u8 = 0x40;
pub const SET_CHARGE_PUMP: u8 = 0x8D;
pub const SET_MEMORY_MODE: u8 = 0x20;
pub const SET_SEG_REMAP: u8 = 0xA1;
pub const SET_COM_SCAN_INC: u8 = 0xC0;
pub const SET_COM_PINS: u8 = 0xDA;
pub const SET_VCOM_DESELECT: u8 = 0xDB;
pub const ENTIRE_DISPLAY_RESUME: u8 = 0xA4;
pub const SET_NORMAL: u8 = 0xA6;
pub const SET_COLUMN_ADDR: u8 = 0x21;
pub const SET_PAGE_ADDR: u8 = 0x22;

/// Control byte prefixing a command payload on the bus.
pub const CONTROL_COMMAND: u8 = 0x00;
/// Control byte prefixing a data chunk on the bus.
pub const CONTROL_DATA: u8 = 0x40;
