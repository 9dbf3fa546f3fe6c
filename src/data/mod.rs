pub mod degree;
pub mod init;
pub mod io;
pub mod normalise;
pub mod similarity;
pub mod structures;
