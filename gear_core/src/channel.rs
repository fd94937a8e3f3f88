//! Sensor channels and the per-tick reading snapshot.

use gear_traits::CHANNEL_COUNT;
use serde::Serialize;

/// Full-scale count of the 10-bit converter (5 V).
pub const ADC_MAX: u16 = 1023;

/// One Hall-effect sensor position, in fixed priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Channel {
    Gear1,
    Gear2,
    Gear3,
    Gear4,
    Gear5,
    Reverse,
}

impl Channel {
    pub const ALL: [Channel; CHANNEL_COUNT] = [
        Channel::Gear1,
        Channel::Gear2,
        Channel::Gear3,
        Channel::Gear4,
        Channel::Gear5,
        Channel::Reverse,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Channel::Gear1 => 0,
            Channel::Gear2 => 1,
            Channel::Gear3 => 2,
            Channel::Gear4 => 3,
            Channel::Gear5 => 4,
            Channel::Reverse => 5,
        }
    }

    pub const fn from_index(index: usize) -> Option<Channel> {
        if index < CHANNEL_COUNT {
            Some(Self::ALL[index])
        } else {
            None
        }
    }

    /// Label used in diagnostic dumps ("Gear 1" .. "Gear R").
    pub const fn label(self) -> &'static str {
        match self {
            Channel::Gear1 => "Gear 1",
            Channel::Gear2 => "Gear 2",
            Channel::Gear3 => "Gear 3",
            Channel::Gear4 => "Gear 4",
            Channel::Gear5 => "Gear 5",
            Channel::Reverse => "Gear R",
        }
    }

    /// Single character tag ('1'..'5', 'R').
    pub const fn tag(self) -> char {
        match self {
            Channel::Gear1 => '1',
            Channel::Gear2 => '2',
            Channel::Gear3 => '3',
            Channel::Gear4 => '4',
            Channel::Gear5 => '5',
            Channel::Reverse => 'R',
        }
    }
}

/// Immutable snapshot of all six channels for one tick.
///
/// Values above `ADC_MAX` are clamped on construction, so every stored value
/// is a valid 10-bit count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Readings([u16; CHANNEL_COUNT]);

impl Readings {
    pub fn new(raw: [u16; CHANNEL_COUNT]) -> Self {
        Self(raw.map(|v| v.min(ADC_MAX)))
    }

    /// All channels reading the same value.
    pub fn uniform(value: u16) -> Self {
        Self::new([value; CHANNEL_COUNT])
    }

    #[inline]
    pub fn get(&self, channel: Channel) -> u16 {
        self.0[channel.index()]
    }

    #[inline]
    pub fn as_array(&self) -> &[u16; CHANNEL_COUNT] {
        &self.0
    }

    /// Channels paired with their values, in priority order.
    pub fn iter(&self) -> impl Iterator<Item = (Channel, u16)> + '_ {
        Channel::ALL.iter().map(move |&ch| (ch, self.get(ch)))
    }
}

impl From<[u16; CHANNEL_COUNT]> for Readings {
    fn from(raw: [u16; CHANNEL_COUNT]) -> Self {
        Self::new(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_round_trips_in_priority_order() {
        for (i, ch) in Channel::ALL.iter().enumerate() {
            assert_eq!(ch.index(), i);
            assert_eq!(Channel::from_index(i), Some(*ch));
        }
        assert_eq!(Channel::from_index(6), None);
    }

    #[test]
    fn readings_clamp_to_adc_range() {
        let r = Readings::new([0, 1023, 1024, u16::MAX, 7, 512]);
        assert_eq!(r.as_array(), &[0, 1023, 1023, 1023, 7, 512]);
    }
}
