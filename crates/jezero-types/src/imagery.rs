//! Per-sol raw imagery grouped by camera.
//!
//! The data backend indexes raw image URLs by sol and camera and attaches
//! them to traverse features. The layout mirrors the camera suites of the
//! two vehicles: the rover reports engineering and science cameras, the
//! helicopter its navigation and color cameras.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::vehicle::Vehicle;

/// A camera suite within [`SolImages`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub enum CameraGroup {
    /// Rover navigation, hazard, and sample caching cameras.
    Engineering,
    /// Rover science instruments.
    Science,
    /// Helicopter cameras.
    Helicopter,
}

/// Rover engineering camera image URLs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export, export_to = "bindings/")]
pub struct EngineeringCameras {
    /// Left navigation camera.
    pub navigation_camera_left: Vec<String>,
    /// Right navigation camera.
    pub navigation_camera_right: Vec<String>,
    /// Front hazard camera, left.
    pub front_hazcam_left: Vec<String>,
    /// Front hazard camera, right.
    pub front_hazcam_right: Vec<String>,
    /// Rear hazard camera, left.
    pub rear_hazcam_left: Vec<String>,
    /// Rear hazard camera, right.
    pub rear_hazcam_right: Vec<String>,
    /// Sample caching system camera.
    pub sample_caching_system: Vec<String>,
}

impl EngineeringCameras {
    fn count(&self) -> usize {
        [
            &self.navigation_camera_left,
            &self.navigation_camera_right,
            &self.front_hazcam_left,
            &self.front_hazcam_right,
            &self.rear_hazcam_left,
            &self.rear_hazcam_right,
            &self.sample_caching_system,
        ]
        .iter()
        .map(|urls| urls.len())
        .sum()
    }
}

/// Rover science instrument image URLs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export, export_to = "bindings/")]
pub struct ScienceCameras {
    /// Mastcam-Z, left eye.
    pub mastcam_z_left: Vec<String>,
    /// Mastcam-Z, right eye.
    pub mastcam_z_right: Vec<String>,
    /// MEDA sky camera.
    pub meda_sky_cam: Vec<String>,
    /// PIXL micro context camera.
    pub pixl_micro_context_camera: Vec<String>,
    /// SHERLOC WATSON imager.
    pub sherloc_watson: Vec<String>,
    /// SHERLOC context imager.
    pub sherloc_context_image: Vec<String>,
    /// `SuperCam` remote micro imager.
    pub super_cam_remote_micro_imager: Vec<String>,
}

impl ScienceCameras {
    fn count(&self) -> usize {
        [
            &self.mastcam_z_left,
            &self.mastcam_z_right,
            &self.meda_sky_cam,
            &self.pixl_micro_context_camera,
            &self.sherloc_watson,
            &self.sherloc_context_image,
            &self.super_cam_remote_micro_imager,
        ]
        .iter()
        .map(|urls| urls.len())
        .sum()
    }
}

/// Helicopter camera image URLs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export, export_to = "bindings/")]
pub struct HelicopterCameras {
    /// Downward-looking navigation camera.
    pub navigation_camera: Vec<String>,
    /// Horizon-facing color camera.
    pub color_camera: Vec<String>,
}

/// All image URLs for one sol, grouped by camera suite.
///
/// A group is absent when it was filtered out for a vehicle or never
/// indexed for that sol.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export, export_to = "bindings/")]
pub struct SolImages {
    /// Rover engineering cameras.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub engineering_cameras: Option<EngineeringCameras>,
    /// Rover science cameras.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub science_cameras: Option<ScienceCameras>,
    /// Helicopter cameras.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub helicopter_cameras: Option<HelicopterCameras>,
}

impl SolImages {
    /// Keep only the camera groups that belong to `vehicle`.
    ///
    /// View-layer helper for the detail panel of a selected feature.
    #[must_use]
    pub fn for_vehicle(&self, vehicle: Vehicle) -> Self {
        let groups = vehicle.camera_groups();
        Self {
            engineering_cameras: self
                .engineering_cameras
                .clone()
                .filter(|_| groups.contains(&CameraGroup::Engineering)),
            science_cameras: self
                .science_cameras
                .clone()
                .filter(|_| groups.contains(&CameraGroup::Science)),
            helicopter_cameras: self
                .helicopter_cameras
                .clone()
                .filter(|_| groups.contains(&CameraGroup::Helicopter)),
        }
    }

    /// Total number of image URLs across all groups.
    pub fn image_count(&self) -> usize {
        let engineering = self.engineering_cameras.as_ref().map_or(0, EngineeringCameras::count);
        let science = self.science_cameras.as_ref().map_or(0, ScienceCameras::count);
        let helicopter = self
            .helicopter_cameras
            .as_ref()
            .map_or(0, |h| h.navigation_camera.len().saturating_add(h.color_camera.len()));
        engineering.saturating_add(science).saturating_add(helicopter)
    }
}

/// Thumbnail and full-resolution image indexes keyed by sol.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export, export_to = "bindings/")]
pub struct DatasetImages {
    /// Thumbnail URLs per sol.
    pub thumbnail: BTreeMap<String, SolImages>,
    /// Full-resolution URLs per sol.
    pub image: BTreeMap<String, SolImages>,
}
