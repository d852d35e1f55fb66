//! Card rendering seam
//!
//! Image compositing lives outside this crate. A `DocumentRenderer` takes a
//! finished record and returns the path of whatever it produced. The
//! bundled `JsonCardRenderer` writes the card payload the compositor reads
//! (field names as printed on the physical card).

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::models::errors::AppResult;
use crate::models::types::EktpRecord;
use crate::utils::constants::CARD_DATE_FORMAT;

/// Produces one document per record
pub trait DocumentRenderer {
    fn render(&self, record: &EktpRecord) -> AppResult<PathBuf>;
}

/// Payload consumed by the card compositor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardPayload {
    pub record_id: usize,
    pub nik: String,
    pub nama: String,
    /// Tempat/tanggal lahir
    pub ttl: String,
    pub jenis_kelamin: String,
    pub golongan_darah: String,
    pub alamat: String,
    #[serde(rename = "rt/rw")]
    pub rt_rw: String,
    #[serde(rename = "kel/desa")]
    pub kel_desa: String,
    pub kecamatan: String,
    pub agama: String,
    pub status: String,
    pub pekerjaan: String,
    pub kewarganegaraan: String,
    pub masa_berlaku: String,
    pub provinsi: String,
    pub kota: String,
    pub terbuat: String,
    pub pas_photo: String,
}

impl CardPayload {
    pub fn from_record(record: &EktpRecord, photo_path: &Path) -> Self {
        let id = &record.identity;
        Self {
            record_id: record.record_id,
            nik: id.nik.clone(),
            nama: id.full_name.clone(),
            ttl: format!(
                "{}, {}",
                record.birth_place,
                id.birth_date.format(CARD_DATE_FORMAT)
            ),
            jenis_kelamin: id.gender.as_str().to_string(),
            golongan_darah: record.blood_type.clone(),
            alamat: record.address.clone(),
            rt_rw: record.rt_rw.clone(),
            kel_desa: record.village_kelurahan.clone(),
            kecamatan: record.district_kecamatan.clone(),
            agama: record.religion.clone(),
            status: record.marital_status.clone(),
            pekerjaan: record.occupation.clone(),
            kewarganegaraan: record.nationality.clone(),
            masa_berlaku: record.valid_until.clone(),
            provinsi: record.province.clone(),
            kota: record.regency_city.clone(),
            terbuat: record.issue_date.format(CARD_DATE_FORMAT).to_string(),
            pas_photo: photo_path.display().to_string(),
        }
    }
}

/// Writes `ktp_<record_id>.json` payloads into a directory
pub struct JsonCardRenderer {
    output_dir: PathBuf,
    photo_path: PathBuf,
}

impl JsonCardRenderer {
    pub fn new(output_dir: impl Into<PathBuf>, photo_path: impl Into<PathBuf>) -> AppResult<Self> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir)?;
        Ok(Self {
            output_dir,
            photo_path: photo_path.into(),
        })
    }
}

impl DocumentRenderer for JsonCardRenderer {
    fn render(&self, record: &EktpRecord) -> AppResult<PathBuf> {
        let payload = CardPayload::from_record(record, &self.photo_path);
        let path = self
            .output_dir
            .join(format!("ktp_{}.json", record.record_id));
        fs::write(&path, serde_json::to_string_pretty(&payload)?)?;
        Ok(path)
    }
}

/// Render every record, stopping at the first failure
pub fn render_all<D: DocumentRenderer + ?Sized>(
    renderer: &D,
    records: &[EktpRecord],
) -> AppResult<Vec<PathBuf>> {
    let paths = records
        .iter()
        .map(|r| renderer.render(r))
        .collect::<AppResult<Vec<_>>>()?;
    info!("🪪 Rendered {} card(s)", paths.len());
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::generator::EktpGenerator;
    use crate::models::config::GeneratorConfig;
    use crate::models::types::BaseRecord;

    fn sample() -> EktpRecord {
        let config = GeneratorConfig {
            mismatch_percentage: 0.0,
            seed: Some(17),
            ..Default::default()
        };
        let base = BaseRecord::new()
            .with("full_name", "Dewi Kartika")
            .with("phone_number", "081300001111");
        EktpGenerator::new(&config)
            .unwrap()
            .generate_record(3, &base)
            .unwrap()
    }

    #[test]
    fn test_payload_fields() {
        let record = sample();
        let payload = CardPayload::from_record(&record, Path::new("photo.jpg"));
        assert_eq!(payload.nama, "Dewi Kartika");
        assert!(payload.ttl.starts_with(&format!("{}, ", record.birth_place)));
        assert_eq!(payload.masa_berlaku, "SEUMUR HIDUP");

        let json = serde_json::to_string(&payload).unwrap();
        assert!(json.contains("\"rt/rw\""));
        assert!(json.contains("\"kel/desa\""));
    }

    #[test]
    fn test_json_renderer_writes_per_record_file() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = JsonCardRenderer::new(dir.path().join("cards"), "photo.jpg").unwrap();
        let paths = render_all(&renderer, &[sample()]).unwrap();

        assert_eq!(paths.len(), 1);
        assert!(paths[0].ends_with("ktp_3.json"));
        let parsed: CardPayload =
            serde_json::from_str(&fs::read_to_string(&paths[0]).unwrap()).unwrap();
        assert_eq!(parsed.record_id, 3);
        assert_eq!(parsed.pas_photo, "photo.jpg");
    }
}
