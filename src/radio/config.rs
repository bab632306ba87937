use crate::radio::rf24::bit_fields::{Config, Feature, RfSetup, SetupRetry};
use crate::radio::rf24::limits;
use crate::{CrcLength, DataRate, PaLevel, StatusFlags};

/// A struct to contain configuration about pipe addresses.
#[derive(Debug, Clone, Copy)]
struct PipeAddresses {
    tx_address: [u8; 5],
    pipe0: [u8; 5],
    pipe1: [u8; 5],
    /// The distinguishing byte of pipes 2 - 5.
    subaddresses: [u8; 4],
}

impl Default for PipeAddresses {
    fn default() -> Self {
        Self {
            tx_address: [0xD5; 5],
            pipe0: [0xD5; 5],
            pipe1: [0xC1, 0xC3, 0xC3, 0xC3, 0xC3],
            subaddresses: [0xC2, 0xC3, 0xC4, 0xC5],
        }
    }
}

/// An object to configure the radio.
///
/// This struct follows a builder pattern. Since all fields are private, users should
/// start with the [`RadioConfig::default`] constructor, then mutate the object accordingly.
/// ```
/// use rf24_dispatch::radio::RadioConfig;
/// let config = RadioConfig::default().with_channel(42);
/// assert_eq!(config.channel(), 42);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RadioConfig {
    pub(crate) config_reg: Config,
    pub(crate) auto_retries: SetupRetry,
    pub(crate) setup_rf: RfSetup,
    pub(crate) feature: Feature,
    auto_ack: u8,
    rx_pipes: u8,
    address_width: u8,
    channel: u8,
    payload_widths: [u8; 6],
    dynamic_payloads: u8,
    pipes: PipeAddresses,
}

impl Default for RadioConfig {
    /// Instantiate a [`RadioConfig`] object with library defaults.
    ///
    /// | feature | default value |
    /// |--------:|:--------------|
    /// | [`RadioConfig::channel()`] | `0` |
    /// | [`RadioConfig::address_width()`] | `5` |
    /// | [`RadioConfig::pa_level()`] | [`PaLevel::Max`] |
    /// | [`RadioConfig::crc_length()`] | [`CrcLength::Bit16`] |
    /// | [`RadioConfig::data_rate()`] | [`DataRate::Kbps250`] |
    /// | [`RadioConfig::payload_width()`] | `1` on every pipe |
    /// | [`RadioConfig::dynamic_payloads()`] | `0` (disabled on every pipe) |
    /// | [`RadioConfig::auto_ack()`] | `0x3F` (enabled for pipes 0 - 5) |
    /// | [`RadioConfig::rx_pipes()`] | `0x3F` (pipes 0 - 5 open) |
    /// | [`RadioConfig::ack_payloads()`] | `false` |
    /// | [`RadioConfig::ask_no_ack()`] | `true` |
    /// | [`RadioConfig::auto_retry_delay()`] | `1` (500 us) |
    /// | [`RadioConfig::auto_retry_count()`] | `15` |
    /// | [`RadioConfig::is_rx()`] | `true` |
    /// | [`RadioConfig::tx_address()`] | `[0xD5; 5]` |
    /// | [`RadioConfig::rx_address()`] | See below table |
    /// | [`RadioConfig::irq_flags()`] | all events reflected on the IRQ pin |
    ///
    /// ## Default RX pipes' addresses
    ///
    /// | pipe number | address     |
    /// |-------------|-------------|
    /// |      0      | `[0xD5; 5]` |
    /// |      1      | `[0xC1, 0xC3, 0xC3, 0xC3, 0xC3]` |
    /// |      2[^1]  | `0xC2`      |
    /// |      3[^1]  | `0xC3`      |
    /// |      4[^1]  | `0xC4`      |
    /// |      5[^1]  | `0xC5`      |
    ///
    /// [^1]: Remember, pipes 2 - 5 share the same 4 upper bytes as the address on pipe 1.
    fn default() -> Self {
        Self {
            /*
               - all events enabled for IRQ pin
               - 16 bit CRC
               - powered up
               - primary receiver
            */
            config_reg: Config::default().with_power(true).as_rx(),
            /*
               - 1 * 250 + 250 = 500 us delay between attempts
               - 15 max attempts
            */
            auto_retries: SetupRetry::default(),
            /*
                - 250 Kbps data rate
                - Max PA level
            */
            setup_rf: RfSetup::default(),
            // only the ask_no_ack param is allowed
            feature: Feature::default().with_en_dyn_ack(true),
            auto_ack: 0x3F,
            rx_pipes: 0x3F,
            address_width: 5,
            channel: 0,
            payload_widths: [1; 6],
            dynamic_payloads: 0,
            pipes: PipeAddresses::default(),
        }
    }
}

impl RadioConfig {
    /// Returns the value set by [`RadioConfig::with_crc_length()`].
    pub const fn crc_length(&self) -> CrcLength {
        self.config_reg.crc_length()
    }

    /// The Cyclical Redundancy Checksum (CRC) length.
    ///
    /// See [`EsbCrcLength::set_crc_length()`](fn@crate::radio::prelude::EsbCrcLength::set_crc_length).
    pub fn with_crc_length(self, length: CrcLength) -> Self {
        Self {
            config_reg: self.config_reg.with_crc_length(length),
            ..self
        }
    }

    /// Is the radio configured as a primary receiver?
    pub const fn is_rx(&self) -> bool {
        self.config_reg.is_rx()
    }

    /// Select the role written to CONFIG (`true` for RX, `false` for TX).
    pub fn with_rx(self, is_rx: bool) -> Self {
        let config_reg = if is_rx {
            self.config_reg.as_rx()
        } else {
            self.config_reg.as_tx()
        };
        Self { config_reg, ..self }
    }

    /// Returns the events set by [`RadioConfig::with_irq_flags()`].
    pub fn irq_flags(&self) -> StatusFlags {
        StatusFlags::default()
            .with_rx_dr(self.config_reg.rx_dr())
            .with_tx_ds(self.config_reg.tx_ds())
            .with_tx_df(self.config_reg.tx_df())
    }

    /// Choose which events are reflected on the radio's IRQ pin.
    ///
    /// See [`EsbStatus::set_irq_flags()`](fn@crate::radio::prelude::EsbStatus::set_irq_flags).
    pub fn with_irq_flags(self, flags: StatusFlags) -> Self {
        Self {
            config_reg: self.config_reg.with_irq_flags(flags),
            ..self
        }
    }

    /// Returns the value set by [`RadioConfig::with_data_rate()`].
    pub const fn data_rate(&self) -> DataRate {
        self.setup_rf.data_rate()
    }

    /// The Data Rate (over the air).
    ///
    /// See [`EsbDataRate::set_data_rate()`](fn@crate::radio::prelude::EsbDataRate::set_data_rate).
    pub fn with_data_rate(self, data_rate: DataRate) -> Self {
        Self {
            setup_rf: self.setup_rf.with_data_rate(data_rate),
            ..self
        }
    }

    /// Returns the value set by [`RadioConfig::with_pa_level()`].
    pub const fn pa_level(&self) -> PaLevel {
        self.setup_rf.pa_level()
    }

    /// The Power Amplitude (PA) level.
    ///
    /// See [`EsbPaLevel::set_pa_level()`](fn@crate::radio::prelude::EsbPaLevel::set_pa_level).
    pub fn with_pa_level(self, level: PaLevel) -> Self {
        Self {
            setup_rf: self.setup_rf.with_pa_level(level),
            ..self
        }
    }

    /// Returns the value set by [`RadioConfig::with_address_width()`].
    pub const fn address_width(&self) -> u8 {
        self.address_width
    }

    /// The address width (in bytes).
    ///
    /// Any value outside the range [3, 5] defaults to 5.
    pub fn with_address_width(self, value: u8) -> Self {
        let address_width = match value {
            3..=5 => value,
            _ => limits::MAX_ADDRESS_WIDTH,
        };
        Self {
            address_width,
            ..self
        }
    }

    /// Returns the value set by [`RadioConfig::with_channel()`].
    pub const fn channel(&self) -> u8 {
        self.channel
    }

    /// Set the channel (over the air frequency).
    ///
    /// This value is clamped to range [0, 125].
    /// The radio's frequency can be determined by the following equation:
    /// ```text
    /// frequency (in MHz) = channel + 2400
    /// ```
    pub fn with_channel(self, value: u8) -> Self {
        Self {
            channel: value.min(limits::MAX_CHANNEL),
            ..self
        }
    }

    /// The auto-retry feature's `delay` (set via [`RadioConfig::with_auto_retries()`])
    pub const fn auto_retry_delay(&self) -> u8 {
        self.auto_retries.ard()
    }

    /// The auto-retry feature's `count` (set via [`RadioConfig::with_auto_retries()`])
    pub const fn auto_retry_count(&self) -> u8 {
        self.auto_retries.arc()
    }

    /// Set the auto-retry feature's `delay` and `count` parameters.
    ///
    /// See [`EsbAutoAck::set_auto_retries()`](fn@crate::radio::prelude::EsbAutoAck::set_auto_retries).
    pub fn with_auto_retries(self, delay: u8, count: u8) -> Self {
        let new_config = self
            .auto_retries
            .with_ard(delay.min(15))
            .with_arc(count.min(15));
        Self {
            auto_retries: new_config,
            ..self
        }
    }

    /// Return the value set by [`RadioConfig::with_ask_no_ack()`].
    pub const fn ask_no_ack(&self) -> bool {
        self.feature.en_dyn_ack()
    }

    /// Allow disabling auto-ack per payload.
    ///
    /// See [`EsbRadio::send_data_no_ack()`](fn@crate::radio::prelude::EsbRadio::send_data_no_ack).
    pub fn with_ask_no_ack(self, enable: bool) -> Self {
        Self {
            feature: self.feature.with_en_dyn_ack(enable),
            ..self
        }
    }

    /// Return the value set by [`RadioConfig::with_dynamic_payloads()`].
    ///
    /// Bit 0 describes pipe 0, bit 1 describes pipe 1, and so on.
    pub const fn dynamic_payloads(&self) -> u8 {
        self.dynamic_payloads
    }

    /// Enable dynamically sized payloads on the pipes set in `pipes` (a bit mask).
    ///
    /// The FEATURE register's `EN_DPL` bit follows whether any pipe is enabled.
    /// Disabling every pipe also disables ACK payloads.
    pub fn with_dynamic_payloads(self, pipes: u8) -> Self {
        let pipes = pipes & 0x3F;
        let mut feature = self.feature.with_en_dpl(pipes != 0);
        if pipes == 0 {
            feature = feature.with_en_ack_pay(false);
        }
        Self {
            dynamic_payloads: pipes,
            feature,
            ..self
        }
    }

    /// Return the value set by [`RadioConfig::with_auto_ack()`].
    pub const fn auto_ack(&self) -> u8 {
        self.auto_ack
    }

    /// Enable or disable auto-ACK feature.
    ///
    /// The given value (in binary form) is used to control the auto-ack feature for each pipe.
    /// Bit 0 controls the feature for pipe 0. Bit 1 controls the feature for pipe 1. And so on.
    ///
    /// To enable the feature for pipes 0, 1 and 4:
    /// ```
    /// use rf24_dispatch::radio::RadioConfig;
    /// let config = RadioConfig::default().with_auto_ack(0b010011);
    /// assert_eq!(config.auto_ack(), 0x13);
    /// ```
    pub fn with_auto_ack(self, enable: u8) -> Self {
        Self {
            auto_ack: enable & 0x3F,
            ..self
        }
    }

    /// Return the value set by [`RadioConfig::with_ack_payloads()`].
    pub const fn ack_payloads(&self) -> bool {
        self.feature.en_ack_pay()
    }

    /// Enable or disable custom ACK payloads for auto-ACK packets.
    ///
    /// ACK payloads require auto-ACK and dynamic payloads on pipes 0 and 1.
    /// Enabling ACK payloads also enables those features on both pipes.
    pub fn with_ack_payloads(self, enable: bool) -> Self {
        let (auto_ack, dynamic_payloads) = if enable {
            (self.auto_ack | 3, self.dynamic_payloads | 3)
        } else {
            (self.auto_ack, self.dynamic_payloads)
        };
        Self {
            auto_ack,
            dynamic_payloads,
            feature: self.feature.with_en_ack_pay(enable),
            ..self
        }
    }

    /// Return the mask set by [`RadioConfig::with_rx_pipes()`].
    pub const fn rx_pipes(&self) -> u8 {
        self.rx_pipes
    }

    /// Choose the open RX pipes (a bit mask written to EN_RXADDR).
    pub fn with_rx_pipes(self, pipes: u8) -> Self {
        Self {
            rx_pipes: pipes & 0x3F,
            ..self
        }
    }

    /// Is a specified RX pipe open (`true`) or closed (`false`)?
    pub fn is_rx_pipe_enabled(&self, pipe: u8) -> bool {
        pipe <= limits::MAX_PIPE && self.rx_pipes & (1 << pipe) > 0
    }

    /// Return the static payload width of a `pipe` set by
    /// [`RadioConfig::with_payload_width()`].
    ///
    /// Pipes greater than 5 report `0`.
    pub fn payload_width(&self, pipe: u8) -> u8 {
        self.payload_widths
            .get(pipe as usize)
            .copied()
            .unwrap_or_default()
    }

    /// Set the static payload width of a `pipe`.
    ///
    /// The `width` is clamped to 32 bytes, and invalid pipe numbers are ignored.
    pub fn with_payload_width(self, pipe: u8, width: u8) -> Self {
        let mut payload_widths = self.payload_widths;
        if let Some(slot) = payload_widths.get_mut(pipe as usize) {
            *slot = width.min(limits::MAX_PAYLOAD);
        }
        Self {
            payload_widths,
            ..self
        }
    }

    pub(crate) const fn payload_widths(&self) -> [u8; 6] {
        self.payload_widths
    }

    /// Get the address for a specified `pipe` set by [`RadioConfig::with_rx_address()`].
    ///
    /// For pipes 2 - 5, the upper bytes are taken from pipe 1.
    /// Nothing is copied for pipes greater than 5.
    pub fn rx_address(&self, pipe: u8, address: &mut [u8]) {
        let len = address.len().min(5);
        match pipe {
            0 => address[..len].copy_from_slice(&self.pipes.pipe0[..len]),
            1 => address[..len].copy_from_slice(&self.pipes.pipe1[..len]),
            2..=5 => {
                address[..len].copy_from_slice(&self.pipes.pipe1[..len]);
                if len > 0 {
                    address[0] = self.pipes.subaddresses[pipe as usize - 2];
                }
            }
            _ => (),
        }
    }

    /// Set the address of a specified RX `pipe`.
    ///
    /// This does nothing if the given `pipe` is greater than `5`.
    /// For pipes 2 - 5, only the first byte of `address` is used.
    ///
    /// See also [`RadioConfig::with_tx_address()`].
    pub fn with_rx_address(self, pipe: u8, address: &[u8]) -> Self {
        let mut pipes = self.pipes;
        let len = address.len().min(5);
        if len > 0 {
            match pipe {
                0 => pipes.pipe0[..len].copy_from_slice(&address[..len]),
                1 => pipes.pipe1[..len].copy_from_slice(&address[..len]),
                2..=5 => pipes.subaddresses[pipe as usize - 2] = address[0],
                _ => (),
            }
        }
        Self { pipes, ..self }
    }

    /// Get the address set by [`RadioConfig::with_tx_address()`]
    pub fn tx_address(&self, address: &mut [u8]) {
        let len = address.len().min(5);
        address[..len].copy_from_slice(&self.pipes.tx_address[..len]);
    }

    /// Set the TX address.
    pub fn with_tx_address(self, address: &[u8]) -> Self {
        let mut pipes = self.pipes;
        let len = address.len().min(5);
        pipes.tx_address[..len].copy_from_slice(&address[..len]);
        Self { pipes, ..self }
    }
}
