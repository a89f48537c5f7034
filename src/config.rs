/////////////////////////////////////////////////////////////////////////////////////////////
//
// Declares fit-time settings: kernel choice, displacement scaling, and system storage.
//
// Created on: 09 Feb 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! Declares fit-time settings: kernel choice, displacement scaling, and system storage.

use serde::{Deserialize, Serialize};

use crate::kernels::RadialKernel;

/// Backing layout for the assembled interpolation matrix.
///
/// Purely a performance knob; both modes materialise the same entries and
/// produce the same coefficients to within solver tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum StorageMode {
    /// Dense column-major storage, factorised with partial-pivot LU.
    #[default]
    Dense,

    /// Compressed sparse-column storage, factorised with sparse LU.
    Sparse,
}

/// Settings used to fit an [`RbfSurrogate`](crate::RbfSurrogate).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SurrogateSettings {
    /// Radial kernel applied to scaled pairwise displacements.
    pub kernel: RadialKernel,

    /// Positive scalar dividing every displacement vector before the kernel
    /// sees it; controls the kernel's effective width.
    pub scale_factor: f64,

    /// Dense or sparse backing for the assembled system.
    pub storage_mode: StorageMode,

    /// Relative tolerance for the post-solve interpolation check. A fit
    /// whose residual at its own sample points exceeds this is rejected as
    /// singular rather than returned as a degraded model.
    pub fitting_tolerance: f64,
}

impl Default for SurrogateSettings {
    fn default() -> Self {
        SurrogateSettingsBuilder::new(RadialKernel::Linear).build()
    }
}

impl SurrogateSettings {
    /// Returns a new [`SurrogateSettingsBuilder`] for the given kernel type.
    pub fn builder(kernel: RadialKernel) -> SurrogateSettingsBuilder {
        SurrogateSettingsBuilder::new(kernel)
    }
}

/// A convenience builder for constructing a [`SurrogateSettings`] instance.
///
/// The builder should be called via the [`SurrogateSettings::builder`] method.
///
/// See [`SurrogateSettings`] for details on each field.
#[derive(Debug, Clone, Copy)]
pub struct SurrogateSettingsBuilder {
    pub kernel: RadialKernel,
    pub scale_factor: f64,
    pub storage_mode: StorageMode,
    pub fitting_tolerance: f64,
}

impl SurrogateSettingsBuilder {
    /// Creates a new instance of the [`SurrogateSettingsBuilder`].
    fn new(kernel: RadialKernel) -> Self {
        Self {
            kernel,
            scale_factor: 1.0,
            storage_mode: StorageMode::Dense,
            fitting_tolerance: 1E-6,
        }
    }

    /// Sets the displacement scale factor.
    pub fn scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    /// Sets the system storage mode.
    pub fn storage_mode(mut self, storage_mode: StorageMode) -> Self {
        self.storage_mode = storage_mode;
        self
    }

    /// Sets the relative tolerance of the post-solve interpolation check.
    pub fn fitting_tolerance(mut self, fitting_tolerance: f64) -> Self {
        self.fitting_tolerance = fitting_tolerance;
        self
    }

    /// Builds and returns an instance of [`SurrogateSettings`] from the
    /// values defined in the builder.
    pub fn build(self) -> SurrogateSettings {
        SurrogateSettings {
            kernel: self.kernel,
            scale_factor: self.scale_factor,
            storage_mode: self.storage_mode,
            fitting_tolerance: self.fitting_tolerance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_linear_dense_unit_scale() {
        let settings = SurrogateSettings::default();
        assert_eq!(settings.kernel, RadialKernel::Linear);
        assert_eq!(settings.scale_factor, 1.0);
        assert_eq!(settings.storage_mode, StorageMode::Dense);
        assert_eq!(settings.fitting_tolerance, 1E-6);
    }

    #[test]
    fn builder_applies_overrides() {
        let settings = SurrogateSettings::builder(RadialKernel::ThinPlate)
            .scale_factor(2.5)
            .storage_mode(StorageMode::Sparse)
            .fitting_tolerance(1E-8)
            .build();

        assert_eq!(settings.kernel, RadialKernel::ThinPlate);
        assert_eq!(settings.scale_factor, 2.5);
        assert_eq!(settings.storage_mode, StorageMode::Sparse);
        assert_eq!(settings.fitting_tolerance, 1E-8);
    }
}
