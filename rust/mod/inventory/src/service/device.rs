use std::collections::HashSet;

use medinv_core::ServiceError;
use serde::Serialize;

use crate::model::{DeviceRecord, DistinctField};
use crate::repository::distinct_in;

use super::InventoryService;

/// Filters for listing devices. All present filters must match.
#[derive(Debug, Clone, Default)]
pub struct DeviceFilters {
    /// Case-insensitive substring over name, serial number, manufacturer and model.
    pub q: Option<String>,
    /// Exact category.
    pub category: Option<String>,
    /// Exact location.
    pub location: Option<String>,
}

impl DeviceFilters {
    fn matches(&self, record: &DeviceRecord, needle: Option<&str>) -> bool {
        if let Some(needle) = needle {
            let hit = [
                Some(record.device_name.as_str()),
                record.serial_number.as_deref(),
                Some(record.manufacturer.as_str()),
                Some(record.model.as_str()),
            ]
            .into_iter()
            .flatten()
            .any(|v| v.to_lowercase().contains(needle));
            if !hit {
                return false;
            }
        }
        if let Some(category) = non_empty(&self.category) {
            if record.device_category.as_deref() != Some(category) {
                return false;
            }
        }
        if let Some(location) = non_empty(&self.location) {
            if record.device_location.as_deref() != Some(location) {
                return false;
            }
        }
        true
    }
}

fn non_empty(v: &Option<String>) -> Option<&str> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Values for the list page's filter dropdowns and the form's suggestions.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DeviceOptions {
    pub categories: Vec<String>,
    pub locations: Vec<String>,
    pub manufacturers: Vec<String>,
}

/// Summary counters shown on the list page.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeviceStats {
    pub total_devices: usize,
    pub unique_manufacturers: usize,
    pub devices_with_warranty: usize,
}

impl InventoryService {
    pub fn list_devices(&self, filters: &DeviceFilters) -> Result<Vec<DeviceRecord>, ServiceError> {
        let needle = non_empty(&filters.q).map(str::to_lowercase);
        Ok(self
            .devices
            .list_all()?
            .into_iter()
            .filter(|r| filters.matches(r, needle.as_deref()))
            .collect())
    }

    pub fn get_device(&self, id: u64) -> Result<DeviceRecord, ServiceError> {
        self.devices.get(id)
    }

    pub fn create_device(&self, record: DeviceRecord) -> Result<DeviceRecord, ServiceError> {
        self.devices.insert(record)
    }

    /// Replace device `id` with `payload`.
    ///
    /// The path identity wins over any identity in the payload. Image
    /// references already attached are kept: the result is the union of
    /// existing and submitted paths, existing first.
    pub fn update_device(&self, id: u64, payload: DeviceRecord) -> Result<DeviceRecord, ServiceError> {
        self.devices.modify(id, move |current| {
            let image_urls = merge_image_urls(current.image_urls.as_deref(), payload.image_urls.clone());
            DeviceRecord {
                sequence_number: Some(id),
                image_urls,
                ..payload
            }
        })
    }

    pub fn delete_device(&self, id: u64) -> Result<(), ServiceError> {
        self.devices.remove(id)
    }

    pub fn device_options(&self) -> Result<DeviceOptions, ServiceError> {
        let records = self.devices.list_all()?;
        Ok(DeviceOptions {
            categories: distinct_in(&records, DistinctField::DeviceCategory),
            locations: distinct_in(&records, DistinctField::DeviceLocation),
            manufacturers: distinct_in(&records, DistinctField::Manufacturer),
        })
    }

    pub fn device_stats(&self) -> Result<DeviceStats, ServiceError> {
        let records = self.devices.list_all()?;
        let with_warranty = records
            .iter()
            .filter(|r| r.warranty_period.as_deref().is_some_and(|w| !w.is_empty()))
            .count();
        Ok(DeviceStats {
            total_devices: records.len(),
            unique_manufacturers: distinct_in(&records, DistinctField::Manufacturer).len(),
            devices_with_warranty: with_warranty,
        })
    }
}

/// Union of image references, existing entries first, no duplicates.
///
/// An omitted submission keeps the existing list untouched.
pub fn merge_image_urls(existing: Option<&[String]>, submitted: Option<Vec<String>>) -> Option<Vec<String>> {
    let (existing, submitted) = match (existing, submitted) {
        (None, submitted) => return submitted,
        (Some(existing), None) => return Some(existing.to_vec()),
        (Some(existing), Some(submitted)) => (existing, submitted),
    };

    let mut seen = HashSet::new();
    let merged = existing
        .iter()
        .cloned()
        .chain(submitted)
        .filter(|url| seen.insert(url.clone()))
        .collect();
    Some(merged)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use medinv_blob::FileStore;
    use medinv_doc::MemoryDoc;

    use super::*;

    fn make_service() -> (InventoryService, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let blob = FileStore::open(&dir.path().join("uploads")).unwrap();
        let svc = InventoryService::new(Arc::new(MemoryDoc::new()), Arc::new(blob));
        (svc, dir)
    }

    fn device(name: &str, manufacturer: &str, model: &str) -> DeviceRecord {
        DeviceRecord {
            device_name: name.into(),
            manufacturer: manufacturer.into(),
            model: model.into(),
            ..Default::default()
        }
    }

    fn urls(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn merge_union_existing_first() {
        let existing = urls(&["/a.png", "/b.png"]);
        let merged = merge_image_urls(Some(existing.as_slice()), Some(urls(&["/b.png", "/c.png"])));
        assert_eq!(merged, Some(urls(&["/a.png", "/b.png", "/c.png"])));
    }

    #[test]
    fn merge_omitted_submission_keeps_existing() {
        let existing = urls(&["/a.png"]);
        assert_eq!(merge_image_urls(Some(existing.as_slice()), None), Some(urls(&["/a.png"])));
    }

    #[test]
    fn merge_empty_submission_keeps_existing() {
        let existing = urls(&["/a.png"]);
        assert_eq!(merge_image_urls(Some(existing.as_slice()), Some(vec![])), Some(urls(&["/a.png"])));
    }

    #[test]
    fn merge_without_existing_takes_submission() {
        assert_eq!(merge_image_urls(None, Some(urls(&["/x.png"]))), Some(urls(&["/x.png"])));
        assert_eq!(merge_image_urls(None, None), None);
    }

    #[test]
    fn update_keeps_path_identity_and_merges_images() {
        let (svc, _dir) = make_service();
        let mut d = device("X-Ray", "Siemens", "Ysio Max");
        d.image_urls = Some(urls(&["/uploads/devices/1/1-front.jpg"]));
        d.serial_number = Some("SN-9".into());
        svc.create_device(d).unwrap();

        let mut payload = device("X-Ray Room 2", "Siemens", "Ysio Max");
        payload.sequence_number = Some(77);
        payload.image_urls = Some(urls(&["/uploads/devices/1/2-back.jpg"]));
        let updated = svc.update_device(1, payload).unwrap();

        assert_eq!(updated.sequence_number, Some(1));
        assert_eq!(updated.device_name, "X-Ray Room 2");
        // Replacement is wholesale apart from images.
        assert_eq!(updated.serial_number, None);
        assert_eq!(
            updated.image_urls,
            Some(urls(&["/uploads/devices/1/1-front.jpg", "/uploads/devices/1/2-back.jpg"]))
        );
        assert_eq!(svc.get_device(1).unwrap(), updated);
        assert!(matches!(svc.get_device(77), Err(ServiceError::NotFound(_))));
    }

    #[test]
    fn update_without_images_preserves_them() {
        let (svc, _dir) = make_service();
        let mut d = device("Pump", "Baxter", "Sigma");
        d.image_urls = Some(urls(&["/uploads/devices/1/1-p.jpg"]));
        svc.create_device(d).unwrap();

        let updated = svc.update_device(1, device("Pump", "Baxter", "Spectrum")).unwrap();
        assert_eq!(updated.model, "Spectrum");
        assert_eq!(updated.image_urls, Some(urls(&["/uploads/devices/1/1-p.jpg"])));
    }

    #[test]
    fn update_missing_is_not_found() {
        let (svc, _dir) = make_service();
        assert!(matches!(
            svc.update_device(5, device("A", "B", "C")),
            Err(ServiceError::NotFound(_))
        ));
    }

    #[test]
    fn list_filters() {
        let (svc, _dir) = make_service();
        let mut a = device("Patient Monitor", "Philips", "IntelliVue MX450");
        a.device_category = Some("ICU".into());
        a.device_location = Some("Ward 3".into());
        a.serial_number = Some("PH-0042".into());
        let mut b = device("Ventilator", "Draeger", "Evita V300");
        b.device_category = Some("ICU".into());
        b.device_location = Some("Ward 5".into());
        let mut c = device("Ultrasound", "Philips", "EPIQ 7");
        c.device_category = Some("Radiology".into());
        for d in [a, b, c] {
            svc.create_device(d).unwrap();
        }

        let names = |f: DeviceFilters| -> Vec<String> {
            svc.list_devices(&f).unwrap().into_iter().map(|d| d.device_name).collect()
        };

        assert_eq!(names(DeviceFilters::default()).len(), 3);
        assert_eq!(
            names(DeviceFilters { q: Some("philips".into()), ..Default::default() }),
            vec!["Patient Monitor", "Ultrasound"]
        );
        assert_eq!(
            names(DeviceFilters { q: Some("ph-00".into()), ..Default::default() }),
            vec!["Patient Monitor"]
        );
        assert_eq!(
            names(DeviceFilters {
                q: Some("philips".into()),
                category: Some("ICU".into()),
                ..Default::default()
            }),
            vec!["Patient Monitor"]
        );
        assert_eq!(
            names(DeviceFilters { location: Some("Ward 5".into()), ..Default::default() }),
            vec!["Ventilator"]
        );
        // Exact match only.
        assert!(names(DeviceFilters { category: Some("icu".into()), ..Default::default() }).is_empty());
        // Blank filters are ignored.
        assert_eq!(
            names(DeviceFilters { q: Some("  ".into()), category: Some(String::new()), ..Default::default() }).len(),
            3
        );
    }

    #[test]
    fn options_and_stats() {
        let (svc, _dir) = make_service();
        let mut a = device("Monitor", "Philips", "MX450");
        a.device_category = Some("ICU".into());
        a.warranty_period = Some("2 years".into());
        let mut b = device("Ventilator", "Draeger", "V300");
        b.device_category = Some("ICU".into());
        b.device_location = Some("Ward 5".into());
        // Any non-empty text counts, whitespace included.
        b.warranty_period = Some(" ".into());
        let mut c = device("Ultrasound", "Philips", "EPIQ 7");
        c.warranty_period = Some(String::new());
        for d in [a, b, c] {
            svc.create_device(d).unwrap();
        }

        let options = svc.device_options().unwrap();
        assert_eq!(options.categories, vec!["ICU"]);
        assert_eq!(options.locations, vec!["Ward 5"]);
        assert_eq!(options.manufacturers, vec!["Draeger", "Philips"]);

        let stats = svc.device_stats().unwrap();
        assert_eq!(
            stats,
            DeviceStats {
                total_devices: 3,
                unique_manufacturers: 2,
                devices_with_warranty: 2,
            }
        );
    }

    #[test]
    fn delete_then_get_is_not_found() {
        let (svc, _dir) = make_service();
        svc.create_device(device("A", "B", "C")).unwrap();
        svc.delete_device(1).unwrap();
        assert!(matches!(svc.get_device(1), Err(ServiceError::NotFound(_))));
        assert!(matches!(svc.delete_device(1), Err(ServiceError::NotFound(_))));
    }
}
