use fat::io::std::FileRegion;
use fat::FileSystem;

use super::device::Error;

pub fn info(fs: &FileSystem<FileRegion>) -> Result<(), Error> {
    let bpb = fs.bpb();
    let geometry = fs.geometry();
    println!("Variant:             {}", fs.variant());
    println!("OEM name:            {}", String::from_utf8_lossy(&bpb.oem_name).trim_end());
    if let Some(label) = fs.volume_label() {
        println!("Volume label:        {}", label);
    }
    if let Some(serial_number) = fs.serial_number() {
        println!("Serial number:       {:04X}-{:04X}", serial_number >> 16, serial_number & 0xFFFF);
    }
    println!("Media descriptor:    {:#04X}", bpb.media);
    println!("Bytes per sector:    {}", geometry.bytes_per_sector());
    println!("Sectors per cluster: {}", geometry.sectors_per_cluster());
    println!("Total sectors:       {}", geometry.total_sectors());
    println!("FAT copies:          {}", geometry.number_of_fats());
    println!("FAT size:            {} sectors", geometry.fat_size_sectors());
    println!("First FAT sector:    {}", geometry.first_fat_sector());
    if fs.variant().has_fixed_root() {
        println!("Root directory:      sector {}", geometry.first_root_directory_sector());
        println!("Root sectors:        {}", geometry.root_dir_sectors());
    } else {
        println!("Root directory:      cluster {}", bpb.root_cluster);
    }
    println!("First data sector:   {}", geometry.first_data_sector());
    println!("Data sectors:        {}", geometry.data_sectors());
    println!("Total clusters:      {}", geometry.total_clusters());
    Ok(())
}
