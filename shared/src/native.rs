use crate::SHARED_MEMORY_SIZE;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

/// Wrapper for file-based shared memory on native platforms (UNIX).
///
/// The mapping is exposed as raw bytes; the codec module owns all structured
/// access. The controller is the only process holding a mutable view, so no
/// locking is layered on top.
pub struct NativeSharedMemory {
    ptr: *mut u8,
    #[allow(dead_code)]
    file: File,
    #[allow(dead_code)]
    path: PathBuf,
}

// Initialize shared memory region (by creating or opening existing)
impl NativeSharedMemory {
    pub fn new(name: &str, create: bool) -> std::io::Result<Self> {
        let path = std::env::temp_dir().join(format!("monkey_shm_{}", name));
        let size = SHARED_MEMORY_SIZE;

        eprintln!(
            "[shared] {} memory at: {:?} (size={})",
            if create { "Creating" } else { "Opening" },
            &path,
            size
        );

        let file = if create {
            let mut file = OpenOptions::new()
                .read(true)
                .write(true)
                .create(true)
                .truncate(true)
                .open(&path)?;
            let zeroes = vec![0u8; size];
            file.write_all(&zeroes)?;
            file.sync_all()?;
            file
        } else {
            OpenOptions::new().read(true).write(true).open(&path)?
        };

        #[cfg(unix)]
        let ptr = unsafe {
            use std::os::unix::io::AsRawFd;
            let fd = file.as_raw_fd();
            let ptr = libc::mmap(
                std::ptr::null_mut(),
                size,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_SHARED,
                fd,
                0,
            );
            if ptr == libc::MAP_FAILED {
                return Err(std::io::Error::last_os_error());
            }
            ptr as *mut u8
        };

        Ok(Self { ptr, file, path })
    }

    pub fn bytes(&self) -> &[u8] {
        unsafe { std::slice::from_raw_parts(self.ptr, SHARED_MEMORY_SIZE) }
    }

    pub fn bytes_mut(&mut self) -> &mut [u8] {
        unsafe { std::slice::from_raw_parts_mut(self.ptr, SHARED_MEMORY_SIZE) }
    }
}

// Drop the shared memory mapping
impl Drop for NativeSharedMemory {
    fn drop(&mut self) {
        #[cfg(unix)]
        unsafe {
            libc::munmap(self.ptr as *mut libc::c_void, SHARED_MEMORY_SIZE);
        }
    }
}

unsafe impl Send for NativeSharedMemory {}

pub fn create_shared_memory(name: &str) -> std::io::Result<NativeSharedMemory> {
    NativeSharedMemory::new(name, true)
}

pub fn open_shared_memory(name: &str) -> std::io::Result<NativeSharedMemory> {
    NativeSharedMemory::new(name, false)
}
