/// A module encapsulating register addresses for the nRF24L01.
pub mod registers {
    pub const CONFIG: u8 = 0x00;
    pub const EN_AA: u8 = 0x01;
    pub const EN_RXADDR: u8 = 0x02;
    pub const SETUP_AW: u8 = 0x03;
    pub const SETUP_RETR: u8 = 0x04;
    pub const RF_CH: u8 = 0x05;
    pub const RF_SETUP: u8 = 0x06;
    pub const STATUS: u8 = 0x07;
    pub const OBSERVE_TX: u8 = 0x08;
    pub const RPD: u8 = 0x09;
    pub const RX_ADDR_P0: u8 = 0x0A;
    pub const RX_ADDR_P1: u8 = 0x0B;
    pub const RX_ADDR_P2: u8 = 0x0C;
    pub const RX_ADDR_P3: u8 = 0x0D;
    pub const RX_ADDR_P4: u8 = 0x0E;
    pub const RX_ADDR_P5: u8 = 0x0F;
    pub const TX_ADDR: u8 = 0x10;
    pub const RX_PW_P0: u8 = 0x11;
    pub const RX_PW_P1: u8 = 0x12;
    pub const RX_PW_P2: u8 = 0x13;
    pub const RX_PW_P3: u8 = 0x14;
    pub const RX_PW_P4: u8 = 0x15;
    pub const RX_PW_P5: u8 = 0x16;
    pub const FIFO_STATUS: u8 = 0x17;
    pub const DYNPD: u8 = 0x1C;
    pub const FEATURE: u8 = 0x1D;
}

/// A module encapsulating SPI commands (instruction bytes) for the nRF24L01.
pub mod commands {
    pub const R_REGISTER: u8 = 0x00;
    pub const W_REGISTER: u8 = 0x20;
    /// Isolates the register address in a `R_REGISTER`/`W_REGISTER` instruction.
    pub const REGISTER_MASK: u8 = 0x1F;
    pub const R_RX_PL_WID: u8 = 0x60;
    pub const R_RX_PAYLOAD: u8 = 0x61;
    pub const W_TX_PAYLOAD: u8 = 0xA0;
    /// The lower 3 bits carry the pipe number.
    pub const W_ACK_PAYLOAD: u8 = 0xA8;
    pub const W_TX_PAYLOAD_NO_ACK: u8 = 0xB0;
    pub const FLUSH_TX: u8 = 0xE1;
    pub const FLUSH_RX: u8 = 0xE2;
    pub const REUSE_TX_PL: u8 = 0xE3;
    pub const NOP: u8 = 0xFF;
}

/// A module to encapsulate bit mnemonics
pub mod mnemonics {
    // CONFIG
    pub const MASK_RX_DR: u8 = 1 << 6;
    pub const MASK_TX_DS: u8 = 1 << 5;
    pub const MASK_MAX_RT: u8 = 1 << 4;
    pub const EN_CRC: u8 = 1 << 3;
    pub const CRC0: u8 = 1 << 2;
    pub const PWR_UP: u8 = 1 << 1;
    pub const PRIM_RX: u8 = 1;

    // STATUS
    pub const RX_DR: u8 = 1 << 6;
    pub const TX_DS: u8 = 1 << 5;
    pub const MAX_RT: u8 = 1 << 4;
    pub const RX_P_NO: u8 = 0b1110;
    pub const STATUS_TX_FULL: u8 = 1;

    // FIFO_STATUS
    pub const TX_REUSE: u8 = 1 << 6;
    pub const FIFO_TX_FULL: u8 = 1 << 5;
    pub const TX_EMPTY: u8 = 1 << 4;
    pub const RX_FULL: u8 = 1 << 1;
    pub const RX_EMPTY: u8 = 1;

    // RF_SETUP
    pub const CONT_WAVE: u8 = 1 << 7;
    pub const RF_DR_LOW: u8 = 1 << 5;
    pub const PLL_LOCK: u8 = 1 << 4;
    pub const RF_DR_HIGH: u8 = 1 << 3;
    pub const RF_PWR: u8 = 0b110;

    // FEATURE
    pub const EN_DPL: u8 = 1 << 2;
    pub const EN_ACK_PAY: u8 = 1 << 1;
    pub const EN_DYN_ACK: u8 = 1;

    /// A bit mask covering all 6 data pipes in EN_AA, EN_RXADDR and DYNPD.
    pub const ALL_PIPES: u8 = 0x3F;
}

/// Hardware limits of the nRF24L01.
pub mod limits {
    /// The largest payload the FIFOs accept.
    pub const MAX_PAYLOAD: u8 = 32;
    /// The highest RF channel.
    pub const MAX_CHANNEL: u8 = 125;
    /// The highest data pipe number.
    pub const MAX_PIPE: u8 = 5;
    /// The widest address (in bytes).
    pub const MAX_ADDRESS_WIDTH: u8 = 5;
}
