use crate::biodivine_std::bitvector::ArrayBitVector;
use crate::fixed_points::FixedPoints;
use crate::symbolic::{Color, ColorLayout};
use crate::{BooleanNetwork, InferenceError};
use cancel_this::is_cancelled;
use log::{debug, info, trace};
use std::collections::BTreeMap;

/// A "flat" configuration object for the explicit fixed-point enumeration.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EnumerationConfig {
    /// Refuse to enumerate networks with more than this number of states (default: `2^16`).
    pub max_states: u128,
    /// Refuse to enumerate networks with more than this number of colors, counting also
    /// the colors later rejected by regulation constraints (default: `2^16`).
    pub max_colors: u128,
}

impl Default for EnumerationConfig {
    fn default() -> Self {
        EnumerationConfig::new(1 << 16, 1 << 16)
    }
}

impl EnumerationConfig {
    pub fn new(max_states: u128, max_colors: u128) -> EnumerationConfig {
        EnumerationConfig {
            max_states,
            max_colors,
        }
    }
}

/// Fixed points of every admissible color, computed without any symbolic representation.
///
/// Colors which are admissible but have no fixed points are stored with an empty list.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EnumeratedFixedPoints {
    fixed_points: BTreeMap<Color, Vec<ArrayBitVector>>,
}

impl EnumeratedFixedPoints {
    /// All admissible colors, sorted.
    pub fn colors(&self) -> impl Iterator<Item = &Color> {
        self.fixed_points.keys()
    }

    /// Number of admissible colors.
    pub fn num_colors(&self) -> usize {
        self.fixed_points.len()
    }

    /// Sorted fixed points of the given `color`, or `None` if the color is not admissible.
    pub fn fixed_points_of(&self, color: &Color) -> Option<&[ArrayBitVector]> {
        self.fixed_points.get(color).map(|it| it.as_slice())
    }

    /// Iterate over all (color, fixed points) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&Color, &[ArrayBitVector])> {
        self.fixed_points.iter().map(|(c, s)| (c, s.as_slice()))
    }

    /// Total number of (state, color) pairs.
    pub fn num_pairs(&self) -> usize {
        self.fixed_points.values().map(|it| it.len()).sum()
    }
}

impl FixedPoints {
    /// Compute the fixed points of every color of `network` by explicitly evaluating
    /// the instantiated update functions in every state.
    ///
    /// This is a reference implementation which does not scale: both the color and
    /// the state space are enumerated. If either exceeds the limits in `config`,
    /// the method fails with `TooLargeForEnumeration` without doing any work.
    pub fn enumerative(
        network: &BooleanNetwork,
        config: &EnumerationConfig,
    ) -> Result<EnumeratedFixedPoints, InferenceError> {
        network.validate()?;
        let layout = ColorLayout::new(network).map_err(InferenceError::MalformedModel)?;

        let states = space_size(network.num_vars());
        let colors = space_size(layout.width());
        let too_large = match (states, colors) {
            (Some(states), Some(colors)) => {
                states > config.max_states || colors > config.max_colors
            }
            _ => true,
        };
        if too_large {
            return Err(InferenceError::TooLargeForEnumeration {
                states: states.unwrap_or(u128::MAX),
                colors: colors.unwrap_or(u128::MAX),
                max_states: config.max_states,
                max_colors: config.max_colors,
            });
        }
        let (states, colors) = (states.unwrap_or_default(), colors.unwrap_or_default());

        info!(
            "Start explicit fixed-point enumeration: {} states and {} colors.",
            states, colors
        );

        let num_vars = network.num_vars();
        let mut fixed_points = BTreeMap::new();
        for color_index in 0..colors {
            is_cancelled!()?;
            let color = Color::from_index(color_index, layout.width());
            if !layout.satisfies_regulation_constraints(network, &color) {
                trace!(" > {} rejected by regulation constraints.", color);
                continue;
            }
            let mut color_fixed_points = Vec::new();
            for state_index in 0..states {
                let state = (0..num_vars)
                    .map(|bit| (state_index >> (num_vars - 1 - bit)) & 1 == 1)
                    .collect::<Vec<_>>();
                if layout.is_fixed_point(network, &color, &state) {
                    color_fixed_points.push(ArrayBitVector::from(state));
                }
            }
            color_fixed_points.sort();
            trace!(
                " > {} has {} fixed points.",
                color,
                color_fixed_points.len()
            );
            fixed_points.insert(color, color_fixed_points);
        }

        let result = EnumeratedFixedPoints { fixed_points };
        debug!(
            "Admissible colors: {}; (state, color) pairs: {}.",
            result.num_colors(),
            result.num_pairs()
        );
        info!("Explicit fixed-point enumeration finished.");
        Ok(result)
    }
}

/// **(internal)** Number of valuations of `bits` Boolean variables, if it fits into `u128`.
fn space_size(bits: usize) -> Option<u128> {
    u32::try_from(bits)
        .ok()
        .and_then(|bits| 1u128.checked_shl(bits))
}
