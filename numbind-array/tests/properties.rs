use numbind_array::*;
use numbind_buffer::{AllocOpts, BufferDescriptor, BufferView};
use rand::Rng;

/// Handle refusing allocations larger than 1KB.
#[derive(Debug, Clone, Default)]
struct LimitedArray(SharedArray);

const LIMIT: usize = 1024;

// # SAFETY
//
// Every call forwards to SharedArray.
unsafe impl WrappeeHandle for LimitedArray {
    fn from_descriptor(desc: &BufferDescriptor) -> Result<Self> {
        let opts = AllocOpts::default().max_bytes(LIMIT);
        SharedArray::with_opts(desc, &opts).map(LimitedArray)
    }

    fn request(&self) -> BufferView {
        self.0.request()
    }

    fn is_unique(&self) -> bool {
        self.0.is_unique()
    }
}

#[test]
fn test_random_len_and_fill() {
    let mut rng = rand::thread_rng();
    for _ in 0..50 {
        let n = rng.gen_range(0..512);
        let arr = Array1D::<u32>::with_len(n).unwrap();
        assert_eq!(n, arr.len());
        assert_eq!(n == 0, arr.is_empty());

        let v: u32 = rng.gen();
        let arr = Array1D::<u32>::from_elem(n, v).unwrap();
        assert!(arr.iter().all(|x| *x == v));
        assert_eq!(n, arr.iter().rev().count());
    }
}

#[test]
fn test_random_sequence_copy() {
    let mut rng = rand::thread_rng();
    for _ in 0..20 {
        let n = rng.gen_range(0..256);
        let src: Vec<f64> = (0..n).map(|_| rng.gen()).collect();
        let arr = Array1D::<f64>::from_exact_iter(src.iter().copied()).unwrap();
        assert_eq!(src.len(), arr.len());
        assert_eq!(&src[..], arr.as_slice());
        let rev: Vec<f64> = arr.iter().rev().copied().collect();
        let mut expected = src.clone();
        expected.reverse();
        assert_eq!(expected, rev);
    }
}

#[test]
fn test_random_cursor_offsets() {
    let mut rng = rand::thread_rng();
    let arr = Array1D::<i64>::from_exact_iter((0..100i32).map(i64::from)).unwrap();
    let begin = arr.begin();
    let end = arr.end();
    for _ in 0..200 {
        let base = rng.gen_range(0..100isize);
        let k = rng.gen_range(0..100isize);
        let it = begin + base;
        // forward offset against k-fold increment
        if base + k < 100 {
            let mut stepped = it;
            for _ in 0..k {
                stepped.step_forward();
            }
            assert_eq!(stepped, it + k);
            assert_eq!(stepped, k + it);
            assert_eq!(base + k, unsafe { *it.at(k) } as isize);
        }
        // backward offset against k-fold decrement
        if base >= k {
            let mut stepped = it;
            for _ in 0..k {
                stepped.step_backward();
            }
            assert_eq!(stepped, it - k);
            assert_eq!(base - k, unsafe { *it.at(-k) } as isize);
        }
        assert!(it < end);
        assert!(it >= begin);
        assert_eq!(base, it - begin);
    }
}

#[test]
fn test_random_resize_sequence() {
    let mut rng = rand::thread_rng();
    let mut arr = Array1D::<i16>::new();
    for _ in 0..50 {
        let n = rng.gen_range(0..64);
        let old_len = arr.len();
        let old_ptr = arr.as_ptr();
        arr.resize(n).unwrap();
        assert_eq!(n, arr.len());
        if n == old_len {
            assert_eq!(old_ptr, arr.as_ptr());
        }
        let v: i16 = rng.gen();
        arr.resize_fill(n, v).unwrap();
        assert!(arr.iter().all(|x| *x == v));
    }
}

#[test]
fn test_random_matrix_resize() {
    let mut rng = rand::thread_rng();
    let mut arr = Array2D::<u8>::with_shape(2, 3).unwrap();
    for _ in 0..50 {
        let (r, c) = (rng.gen_range(0..8), rng.gen_range(0..8));
        let marker: u8 = rng.gen_range(1..=255);
        arr.fill(marker).unwrap();
        let shape = arr.shape();
        arr.resize(r, c).unwrap();
        assert_eq!((r, c), arr.shape());
        assert_eq!(r * c == 0, arr.is_empty());
        if shape == (r, c) && r * c > 0 {
            assert_eq!(marker, arr[(r - 1, c - 1)]);
        }
    }
}

#[test]
fn test_alloc_failure_keeps_state() {
    let mut arr = Array1D::<u64, LimitedArray>::from_elem(4, 6).unwrap();
    let ptr = arr.as_ptr();
    let res = arr.resize(LIMIT);
    assert_eq!(Err(Error::InsufficientMemory(LIMIT * 8)), res);
    assert_eq!(ptr, arr.as_ptr());
    assert_eq!(&[6, 6, 6, 6], arr.as_slice());

    let res = arr.resize_fill(LIMIT, 1);
    assert!(res.is_err());
    assert_eq!(&[6, 6, 6, 6], arr.as_slice());

    assert!(Array1D::<u64, LimitedArray>::with_len(LIMIT).is_err());
    assert!(Array1D::<u64, LimitedArray>::from_exact_iter((0..LIMIT).map(|v| v as u64)).is_err());

    let mut mat = Array2D::<f64, LimitedArray>::from_elem(2, 2, 1.0).unwrap();
    assert_eq!(
        Err(Error::InsufficientMemory(64 * 64 * 8)),
        mat.resize(64, 64)
    );
    assert_eq!((2, 2), mat.shape());
    assert_eq!(1.0, mat[(1, 1)]);
}

#[test]
fn test_alias_across_handles() {
    let mut a = Array1D::<i32>::from_elem(3, 0).unwrap();
    let h = a.to_wrappee();
    let mut b = Array1D::<i32>::from_wrappee(h).unwrap();
    assert!(!a.is_unique());
    assert!(b.get_mut(0).is_none());
    unsafe {
        *b.begin_mut().deref() = 5;
        *a.begin_mut().at(2) = 7;
    }
    assert_eq!(5, a[0]);
    assert_eq!(Some(&7), b.back());
    assert_eq!(a.as_ptr(), b.as_ptr());

    // detach: b starts from an unbound state
    let c = b.take();
    assert!(!b.is_bound());
    assert!(b.is_unique());
    b.resize_fill(3, 1).unwrap();
    assert_eq!(&[5, 0, 7], c.as_slice());
    assert_eq!(&[1, 1, 1], b.as_slice());
    assert_ne!(b.as_ptr(), a.as_ptr());
    // c still shares storage with a
    assert!(!c.is_unique());
    drop(c);
    a[1] = 2;
    assert_eq!(&[5, 2, 7], a.as_slice());
}

#[test]
fn test_random_shared_reads_stable() {
    let mut rng = rand::thread_rng();
    for _ in 0..20 {
        let n = rng.gen_range(1..64);
        let mut a = Array1D::<u16>::from_elem(n, 1).unwrap();
        let mut b = a.clone();
        let i = rng.gen_range(0..n);
        let r = &a[i];
        // writes through a shared clone are refused while any reference lives
        assert!(b.get_mut(i).is_none());
        assert_eq!(Err(Error::SharedStorage), b.fill(rng.gen()));
        assert_eq!(1, *r);
        drop(b);
        a[i] = 3;
        assert_eq!(3, a[i]);
    }
}
