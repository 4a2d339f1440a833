// Pix3D-style dataset annotation: one record per building, written out as a
// single JSON array

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{GenError, Result};

pub const DEFAULT_FOCAL_LENGTH: f32 = 35.0;
pub const DEFAULT_RESOLUTION: (u32, u32) = (256, 256);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnnotationRecord {
    pub img: String,
    pub category: String,
    pub img_size: (u32, u32),
    #[serde(rename = "2d_keypoints")]
    pub keypoints_2d: Vec<f32>,
    pub mask: String,
    pub img_source: String,
    pub model: String,
    pub model_raw: u32,
    pub model_source: String,
    pub trans_mat: u32,
    pub focal_length: f32,
    pub cam_position: (f32, f32, f32),
    pub inplane_rotation: u32,
    pub truncated: bool,
    pub occluded: bool,
    pub slightly_occluded: bool,
    pub bbox: [f32; 4],
}

impl AnnotationRecord {
    // the template a fresh record starts from
    fn template(mask_dir: &str) -> Self {
        Self {
            img: String::new(),
            category: "building".to_string(),
            img_size: DEFAULT_RESOLUTION,
            keypoints_2d: Vec::new(),
            mask: format!("{}/", mask_dir),
            img_source: "synthetic".to_string(),
            model: String::new(),
            model_raw: 0,
            model_source: "synthetic".to_string(),
            trans_mat: 0,
            focal_length: DEFAULT_FOCAL_LENGTH,
            cam_position: (0.0, 0.0, 0.0),
            inplane_rotation: 0,
            truncated: false,
            occluded: false,
            slightly_occluded: false,
            bbox: [0.0; 4],
        }
    }
}

/// Accumulates one record per generated building; the working record resets
/// to the template after every append.
pub struct Annotation {
    mask_dir: String,
    content: AnnotationRecord,
    full: Vec<AnnotationRecord>,
}

impl Annotation {
    pub fn new(mask_dir: &str) -> Self {
        Self {
            mask_dir: mask_dir.to_string(),
            content: AnnotationRecord::template(mask_dir),
            full: Vec::new(),
        }
    }

    /// Camera state is optional; missing values keep the template defaults.
    pub fn set_camera(
        &mut self,
        position: Option<Vec3>,
        focal_length: Option<f32>,
        resolution: Option<(u32, u32)>,
    ) {
        if let Some(p) = position {
            self.content.cam_position = (p.x, p.y, p.z);
        }
        if let Some(f) = focal_length {
            self.content.focal_length = f;
        }
        if let Some((w, h)) = resolution {
            // stored as (height, width), the convention the consumers expect
            self.content.img_size = (h, w);
        }
    }

    /// Appends one record. `bb` is `[x0, y0, x1, y1]` when present; any other
    /// length is a validation error and nothing is appended.
    pub fn add(&mut self, img: &str, model: &str, bb: Option<&[f32]>) -> Result<()> {
        if let Some(bb) = bb
            && bb.len() != 4
        {
            return Err(GenError::BadBoundingBox { got: bb.len() });
        }

        self.content.img = img.to_string();
        let basename = img.rsplit('/').next().unwrap_or(img);
        self.content.mask = format!("{}/{}", self.mask_dir, basename);
        self.content.model = model.to_string();
        if let Some(bb) = bb {
            self.content.bbox = [bb[0], bb[1], bb[2], bb[3]];
        }

        let record = std::mem::replace(&mut self.content, AnnotationRecord::template(&self.mask_dir));
        self.full.push(record);
        Ok(())
    }

    pub fn records(&self) -> &[AnnotationRecord] {
        &self.full
    }

    // dumps the accumulated records as one JSON array
    pub fn write(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer(std::io::BufWriter::new(file), &self.full)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_fills_record_and_resets_template() {
        let mut a = Annotation::new("Masks");
        a.set_camera(Some(Vec3::new(1.0, 2.0, 3.0)), Some(50.0), Some((640, 480)));
        a.add("Images/0.png", "Models/0.obj", Some(&[1.0, 2.0, 3.0, 4.0]))
            .unwrap();

        let r = &a.records()[0];
        assert_eq!(r.img, "Images/0.png");
        assert_eq!(r.mask, "Masks/0.png");
        assert_eq!(r.model, "Models/0.obj");
        assert_eq!(r.cam_position, (1.0, 2.0, 3.0));
        assert_eq!(r.focal_length, 50.0);
        assert_eq!(r.img_size, (480, 640));
        assert_eq!(r.bbox, [1.0, 2.0, 3.0, 4.0]);

        // next record starts from the clean template again
        a.add("Images/1.png", "Models/1.obj", None).unwrap();
        let r = &a.records()[1];
        assert_eq!(r.focal_length, DEFAULT_FOCAL_LENGTH);
        assert_eq!(r.cam_position, (0.0, 0.0, 0.0));
        assert_eq!(r.bbox, [0.0; 4]);
    }

    #[test]
    fn bounding_box_must_have_four_elements() {
        let mut a = Annotation::new("Masks");
        let err = a.add("0.png", "0.obj", Some(&[1.0, 2.0]));
        assert!(matches!(err, Err(GenError::BadBoundingBox { got: 2 })));
        assert!(a.records().is_empty());
    }

    #[test]
    fn writes_one_json_array() {
        let mut a = Annotation::new("Masks");
        a.add("0.png", "0.obj", None).unwrap();
        a.add("1.png", "1.obj", None).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("annotation.json");
        a.write(&path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let parsed: Vec<AnnotationRecord> = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].category, "building");
        assert_eq!(parsed[1].img, "1.png");
        assert!(raw.contains("\"2d_keypoints\""));
    }
}
