use std::path::PathBuf;

use dicom_stack::VolumeLoader;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let directory = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("dicom"));

    let volume = VolumeLoader::load_from_directory(&directory)
        .expect("should have loaded files from directory");

    let (slices, columns, rows) = volume.dim();
    let (dz, dx, dy) = volume.voxel_spacing;
    println!("volume: {slices} x {columns} x {rows}");
    println!("voxel spacing (mm): {dz:.4} x {dx:.4} x {dy:.4}");
}
