use chrono::NaiveDateTime;
use fat::io::std::FileRegion;
use fat::FileSystem;

use super::device::Error;

pub fn list(fs: &FileSystem<FileRegion>, path: &str) -> Result<(), Error> {
    let directory = fs.list(path)?;
    for record in directory.files() {
        let attrs = record.attributes();
        print!("{}", if attrs.directory() { "d" } else { "-" });
        print!("{}", if attrs.read_only() { "r" } else { "-" });
        print!("{}", if attrs.system() { "s" } else { "-" });
        print!("{}", if attrs.hidden() { "h" } else { "-" });
        print!("{}", if attrs.archive() { "a" } else { "-" });
        print!(" {:10}", record.size());
        let modified_at: NaiveDateTime = record.modified().into();
        print!(" {}", modified_at.format("%Y-%m-%d %H:%M:%S"));
        if record.is_directory() {
            println!(" {}/", record.name());
        } else {
            println!(" {}", record.name());
        }
    }
    Ok(())
}
