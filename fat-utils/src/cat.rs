use std::io;
use std::io::Write;

use fat::error::OperationError;
use fat::io::std::FileRegion;
use fat::FileSystem;

use super::device::Error;

pub fn cat(fs: &FileSystem<FileRegion>, path: &str) -> Result<(), Error> {
    let record = fs.find(path)?.ok_or(Error::FS(OperationError::NotFound.into()))?;
    let mut file = fs.open(&record)?;
    let mut stdout = io::stdout().lock();
    let mut buf = vec![0u8; fs.geometry().cluster_size() as usize];
    loop {
        let size = file.read(&mut buf)?;
        if size == 0 {
            break;
        }
        if stdout.write_all(&buf[..size]).is_err() {
            return Err(Error::String("Broken pipe"));
        }
    }
    Ok(())
}
