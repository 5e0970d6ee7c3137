use fat::error::OperationError;
use fat::io::std::FileRegion;
use fat::FileSystem;
use pretty_hex::pretty_hex;

use super::device::Error;

pub fn dump(fs: &FileSystem<FileRegion>, path: &str) -> Result<(), Error> {
    let record = fs.find(path)?.ok_or(Error::FS(OperationError::NotFound.into()))?;
    let bytes = fs.read_to_vec(&record)?;
    println!("{}", pretty_hex(&bytes));
    Ok(())
}
